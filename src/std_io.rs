extern crate std;

use std::io::{self, IoSlice, Write};

use crate::{AlignedAlloc, SvoVec, TryReserveError, align::Alignment};

#[inline]
fn out_of_memory(e: TryReserveError) -> io::Error {
    io::Error::new(io::ErrorKind::OutOfMemory, e)
}

/// Write is implemented for `SvoVec<u8, K>` by appending to the vector.
/// The vector will grow as needed, moving to the heap past `K` bytes.
///
/// Allocation failure is reported as [`io::ErrorKind::OutOfMemory`] and leaves
/// the vector unchanged.
impl<const K: usize, A: Alignment, M: AlignedAlloc> Write for SvoVec<u8, K, A, M> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.try_extend_from_slice(buf).map_err(out_of_memory)?;
        Ok(buf.len())
    }

    #[inline(always)]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[inline]
    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        let num = bufs.iter().map(|b| b.len()).sum::<usize>();
        if !self.is_small() {
            self.try_reserve(num).map_err(out_of_memory)?;
        }
        let old_len = self.len();
        for buf in bufs {
            if let Err(e) = self.try_extend_from_slice(buf) {
                // Nothing from this call may stay behind.
                self.truncate(old_len);
                return Err(out_of_memory(e));
            }
        }
        Ok(num)
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Write::write(self, buf)?;
        Ok(())
    }
}
