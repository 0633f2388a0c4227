use std::fmt;
use std::io::BufRead;
use lazy_static::lazy_static;
use regex::Regex;
use crate::config::MalformedLinePolicy;
use crate::error::TraceError;

lazy_static! {
    // <R|W>: 0x<hex>, up to 64 bits of address
    static ref TRACE_LINE: Regex = Regex::new(r"^\s*([RrWw]):\s*0[xX]([0-9A-Fa-f]{1,16})\s*$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Read,
    Write,
}

/// One memory access from a trace. Reads and writes are treated identically by the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Access {
    pub kind: AccessKind,
    pub address: u64,
}

impl Access {
    pub fn read(address: u64) -> Self {
        Self { kind: AccessKind::Read, address }
    }

    pub fn write(address: u64) -> Self {
        Self { kind: AccessKind::Write, address }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            AccessKind::Read => 'R',
            AccessKind::Write => 'W',
        };
        write!(f, "{kind}: {:#x}", self.address)
    }
}

/// Parses a single trace line, `None` if it isn't well formed
///
/// # Examples
///
/// ```
/// use cachelib::trace::{parse_line, Access};
/// assert_eq!(parse_line("R: 0x1f40"), Some(Access::read(0x1f40)));
/// assert_eq!(parse_line("w:0xFF"), Some(Access::write(0xff)));
/// assert_eq!(parse_line("X: 0x10"), None);
/// ```
pub fn parse_line(line: &str) -> Option<Access> {
    let captures = TRACE_LINE.captures(line)?;
    let kind = match captures.get(1)?.as_str() {
        "R" | "r" => AccessKind::Read,
        _ => AccessKind::Write,
    };
    // At most 16 hex digits, so this can't overflow
    let address = u64::from_str_radix(captures.get(2)?.as_str(), 16).ok()?;
    Some(Access { kind, address })
}

/// Reads a whole trace into memory, in order
///
/// Blank lines are ignored. What happens on the first line which isn't blank and doesn't parse
/// depends on `on_malformed`:
///
/// * `Truncate`: stop reading, the accesses parsed so far are returned
/// * `Skip`: drop the line and carry on
/// * `Error`: fail with [`TraceError::Malformed`]
///
/// Line numbers in logs and errors start at 1
pub fn read_trace<R: BufRead>(reader: R, on_malformed: MalformedLinePolicy) -> Result<Vec<Access>, TraceError> {
    let mut accesses = Vec::new();
    for (number, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line = String::from_utf8_lossy(&bytes);
        if line.trim().is_empty() {
            continue;
        }
        if let Some(access) = parse_line(&line) {
            accesses.push(access);
            continue;
        }
        let line_number = number + 1;
        match on_malformed {
            MalformedLinePolicy::Truncate => {
                tracing::warn!(line = line_number, content = %line.trim_end(), "malformed trace entry, ignoring the rest of the trace");
                break;
            }
            MalformedLinePolicy::Skip => {
                tracing::warn!(line = line_number, content = %line.trim_end(), "skipping malformed trace entry");
            }
            MalformedLinePolicy::Error => {
                return Err(TraceError::Malformed {
                    line: line_number,
                    content: line.trim_end().to_string(),
                });
            }
        }
    }
    tracing::debug!(accesses = accesses.len(), "read trace");
    Ok(accesses)
}
