//! Checked strided vector descriptors
//!
//! A descriptor is a buffer plus a logical length and a stride: element `k`
//! lives at `data[k * stride]`. Construction proves the buffer is long
//! enough, so kernels called through a view can never index out of bounds.

use crate::element::Element;
use crate::error::{Level1Error, Result};

/// Buffer elements a `(len, stride)` descriptor reaches
///
/// `None` when the offset of the last element overflows `usize`.
#[inline]
pub fn required_len(len: usize, stride: usize) -> Option<usize> {
    match len {
        0 => Some(0),
        _ => (len - 1).checked_mul(stride)?.checked_add(1),
    }
}

fn validate(len: usize, stride: isize, available: usize) -> Result<usize> {
    if stride < 1 {
        return Err(Level1Error::InvalidStride(stride));
    }
    let stride = stride as usize;
    let required = required_len(len, stride).ok_or(Level1Error::ReachOverflow { len, stride })?;
    if available < required {
        return Err(Level1Error::BufferTooShort {
            required,
            actual: available,
        });
    }
    Ok(stride)
}

/// Read-only strided view
///
/// # Examples
///
/// ```
/// use rayo::StridedView;
///
/// let buf = [1.0f32, -1.0, 2.0, -1.0, 3.0];
/// let v = StridedView::new(&buf, 3, 2).unwrap();
/// assert_eq!(v.iter().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StridedView<'a, T> {
    data: &'a [T],
    len: usize,
    stride: usize,
}

impl<'a, T: Element> StridedView<'a, T> {
    /// Describe `len` elements of `data` spaced `stride` apart
    ///
    /// # Errors
    ///
    /// [`Level1Error::InvalidStride`] if `stride < 1`,
    /// [`Level1Error::BufferTooShort`] if `data` ends before element `len - 1`,
    /// [`Level1Error::ReachOverflow`] if that offset does not fit in `usize`.
    pub fn new(data: &'a [T], len: usize, stride: isize) -> Result<Self> {
        let stride = validate(len, stride, data.len())?;
        Ok(Self { data, len, stride })
    }

    /// Unit-stride view over a whole slice
    pub fn contiguous(data: &'a [T]) -> Self {
        Self {
            data,
            len: data.len(),
            stride: 1,
        }
    }

    /// Logical element count
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Step between logical elements
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Stride is 1
    pub fn is_contiguous(&self) -> bool {
        self.stride == 1
    }

    /// Element `k`, or `None` past the end
    pub fn get(&self, k: usize) -> Option<T> {
        (k < self.len).then(|| self.data[k * self.stride])
    }

    /// Logical elements in order
    pub fn iter(&self) -> impl Iterator<Item = T> + 'a {
        let data = self.data;
        data.iter().step_by(self.stride).take(self.len).copied()
    }

    pub(crate) fn data(&self) -> &'a [T] {
        self.data
    }
}

/// Writable strided view
#[derive(Debug)]
pub struct StridedViewMut<'a, T> {
    data: &'a mut [T],
    len: usize,
    stride: usize,
}

impl<'a, T: Element> StridedViewMut<'a, T> {
    /// Describe `len` writable elements of `data` spaced `stride` apart
    ///
    /// # Errors
    ///
    /// Same conditions as [`StridedView::new`].
    pub fn new(data: &'a mut [T], len: usize, stride: isize) -> Result<Self> {
        let stride = validate(len, stride, data.len())?;
        Ok(Self { data, len, stride })
    }

    /// Unit-stride view over a whole slice
    pub fn contiguous(data: &'a mut [T]) -> Self {
        let len = data.len();
        Self {
            data,
            len,
            stride: 1,
        }
    }

    /// Logical element count
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Step between logical elements
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Stride is 1
    pub fn is_contiguous(&self) -> bool {
        self.stride == 1
    }

    /// Element `k`, or `None` past the end
    pub fn get(&self, k: usize) -> Option<T> {
        (k < self.len).then(|| self.data[k * self.stride])
    }

    /// Overwrite element `k`; returns `false` past the end
    pub fn set(&mut self, k: usize, value: T) -> bool {
        if k < self.len {
            self.data[k * self.stride] = value;
            true
        } else {
            false
        }
    }

    /// Read-only view of the same elements
    pub fn as_view(&self) -> StridedView<'_, T> {
        StridedView {
            data: &*self.data,
            len: self.len,
            stride: self.stride,
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_len() {
        assert_eq!(required_len(0, 5), Some(0));
        assert_eq!(required_len(1, 5), Some(1));
        assert_eq!(required_len(4, 3), Some(10));
        assert_eq!(required_len(1, usize::MAX), Some(1));
    }

    #[test]
    fn test_required_len_overflow() {
        assert_eq!(required_len(3, usize::MAX / 2 + 1), None);
        assert_eq!(required_len(2, usize::MAX), None);
    }

    #[test]
    fn test_view_rejects_overflowing_reach() {
        let buf = [0.0f32; 4];
        assert_eq!(
            StridedView::new(&buf, 4, isize::MAX).unwrap_err(),
            Level1Error::ReachOverflow {
                len: 4,
                stride: isize::MAX as usize
            }
        );
    }

    #[test]
    fn test_view_rejects_bad_stride() {
        let buf = [0.0f32; 4];
        assert_eq!(
            StridedView::new(&buf, 2, 0).unwrap_err(),
            Level1Error::InvalidStride(0)
        );
        assert_eq!(
            StridedView::new(&buf, 2, -1).unwrap_err(),
            Level1Error::InvalidStride(-1)
        );
    }

    #[test]
    fn test_view_rejects_short_buffer() {
        let buf = [0.0f64; 6];
        assert_eq!(
            StridedView::new(&buf, 3, 3).unwrap_err(),
            Level1Error::BufferTooShort {
                required: 7,
                actual: 6
            }
        );
        assert!(StridedView::new(&buf, 2, 5).is_ok());
    }

    #[test]
    fn test_empty_view_over_empty_buffer() {
        let buf: [f32; 0] = [];
        let v = StridedView::new(&buf, 0, 4).unwrap();
        assert!(v.is_empty());
        assert_eq!(v.get(0), None);
        assert_eq!(v.iter().count(), 0);
    }

    #[test]
    fn test_view_get_and_iter() {
        let buf = [1.0f32, 9.0, 2.0, 9.0, 3.0, 9.0];
        let v = StridedView::new(&buf, 3, 2).unwrap();
        assert_eq!(v.get(2), Some(3.0));
        assert_eq!(v.get(3), None);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert!(!v.is_contiguous());
    }

    #[test]
    fn test_view_mut_set() {
        let mut buf = [0.0f64; 5];
        let mut v = StridedViewMut::new(&mut buf, 3, 2).unwrap();
        assert!(v.set(1, 4.0));
        assert!(!v.set(3, 4.0));
        assert_eq!(v.as_view().iter().collect::<Vec<_>>(), vec![0.0, 4.0, 0.0]);
        assert_eq!(buf, [0.0, 0.0, 4.0, 0.0, 0.0]);
    }
}
