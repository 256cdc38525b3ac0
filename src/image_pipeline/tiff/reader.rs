use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::tiff::types::Page;

/// Random access to the 16-bit pages of an opened container.
pub trait PageReader {
    fn page_count(&self) -> usize;

    fn read_page(&mut self, index: usize) -> Result<Page<u16>>;

    /// Lazily yields every page in stored order.
    ///
    /// The sequence is finite and consumes the reader's position; iterating again means
    /// calling `pages` again.
    fn pages(&mut self) -> Pages<'_, Self>
    where
        Self: Sized,
    {
        Pages {
            reader: self,
            next: 0,
        }
    }
}

/// Iterator returned by [`PageReader::pages`].
pub struct Pages<'a, R: PageReader> {
    reader: &'a mut R,
    next: usize,
}

impl<R: PageReader> Iterator for Pages<'_, R> {
    type Item = Result<Page<u16>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.reader.page_count() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.reader.read_page(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.reader.page_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}
