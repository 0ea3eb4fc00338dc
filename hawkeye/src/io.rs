use std::fs::File;
use std::ops::Deref;

/// The bytes of a trace file, either memory mapped or read into memory
pub enum TraceBuffer {
    #[cfg(unix)]
    Mapped(memmap2::Mmap),
    Owned(Vec<u8>),
}

impl Deref for TraceBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            #[cfg(unix)]
            TraceBuffer::Mapped(m) => &m[..],
            TraceBuffer::Owned(v) => &v[..],
        }
    }
}

/// Loads a trace file for simulation
///
/// On unix systems the file is memory mapped, with the OS advised that reads will be sequential.
/// Elsewhere it is read into memory
pub fn load_trace(file: File) -> Result<TraceBuffer, String> {
    #[cfg(not(unix))]
    {
        use std::io::Read;
        let mut file = file;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).map_err(|e| format!("Couldn't read the trace file: {e}"))?;
        Ok(TraceBuffer::Owned(buffer))
    }
    #[cfg(unix)]
    {
        use memmap2::{Advice, Mmap};
        // An empty file can't be mapped
        if file.metadata().map_err(|e| format!("Couldn't read the trace file's metadata: {e}"))?.len() == 0 {
            return Ok(TraceBuffer::Owned(Vec::new()));
        }
        // Safety: the trace is only read, and isn't expected to be modified while simulating
        unsafe {
            let m = Mmap::map(&file).map_err(|e| format!("Couldn't memory map the file: {e}"))?;
            m.advise(Advice::Sequential).map_err(|e| format!("Failed to provide access advice to the OS, {e}"))?;
            Ok(TraceBuffer::Mapped(m))
        }
    }
}
