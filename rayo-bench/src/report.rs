//! Output lines of a benchmark run
//!
//! stdout carries one CSV row per size, stderr the human-readable progress.

use crate::measure::Measurement;

/// Run header written to stderr before the first size
pub fn header(from: usize, to: usize, step: usize, incx: usize, incy: usize, loops: u32) -> String {
    format!("From : {from:3}  To : {to:3} Step = {step:3} Inc_x = {incx} Inc_y = {incy} Loops = {loops}")
}

/// Column titles for the stderr progress lines
pub const COLUMNS: &str = "   SIZE       Flops";

/// `size,mflops`, prefixed with the thread count when one is configured
pub fn csv_row(threads: Option<&str>, m: &Measurement) -> String {
    match threads {
        Some(t) => format!("{t},{:6},{:10.2}", m.size, m.mflops()),
        None => format!("{:6},{:10.2}", m.size, m.mflops()),
    }
}

/// ` size :  mflops MFlops seconds sec`
pub fn progress_line(m: &Measurement) -> String {
    format!(" {:6} :  {:10.2} MFlops {:10.6} sec", m.size, m.mflops(), m.seconds)
}
