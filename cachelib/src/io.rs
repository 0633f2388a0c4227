use std::fs::File;
use std::io::BufRead;
use std::path::Path;
use crate::error::TraceError;

/// Opens a trace file for sequential reading
pub fn open_trace<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, TraceError> {
    let file = File::open(path)?;
    get_reader(file)
}

pub fn get_reader(file: File) -> Result<Box<dyn BufRead>, TraceError> {
    // Mapping a zero length file fails on some platforms, and there is nothing to gain anyway
    if file.metadata()?.len() == 0 {
        return Ok(buffered(file));
    }
    // Memory map the file for speed on unix systems
    #[cfg(unix)]
    {
        use std::io::Cursor;
        use memmap2::{Advice, Mmap};
        // Safety: the map is read-only, the trace must not be truncated by another process
        // while the simulator reads it
        let m = unsafe { Mmap::map(&file)? };
        m.advise(Advice::Sequential)?;
        Ok(Box::new(Cursor::new(m)))
    }
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        Ok(buffered(file))
    }
}

fn buffered(file: File) -> Box<dyn BufRead> {
    use std::io::BufReader;
    // Traces are read once, front to back, 4096 is the standard block size (or a multiple of it) on most systems
    const BUFFER_SIZE: usize = 16 * 4096;
    Box::new(BufReader::with_capacity(BUFFER_SIZE, file))
}
