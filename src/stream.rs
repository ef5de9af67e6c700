// Reading and writing dumps line by line

use std::io::{self, BufRead, Write};

use crate::rule::TransformResult;
use crate::transducer::Transducer;

/// Iterator over the raw lines of a dump.
///
/// Strips `\n` and `\r\n` terminators. Line content is passed on byte for
/// byte, whatever its encoding.
pub struct DumpLines<R> {
    reader: R,
}

impl<R: BufRead> DumpLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for DumpLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                Some(Ok(buf))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Line counts for one translated dump.
///
/// Every input line is counted as dropped when it yields no output, so
/// `lines_dropped + lines that emitted == lines_read`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateStats {
    pub lines_read: usize,
    pub lines_emitted: usize,
    pub lines_dropped: usize,
}

/// Translate everything `reader` yields into `writer`, one `\n`-terminated
/// line per emitted line. Flushes `writer` once the input is exhausted.
pub fn translate_stream<R, W>(
    transducer: &Transducer,
    reader: R,
    mut writer: W,
) -> io::Result<TranslateStats>
where
    R: BufRead,
    W: Write,
{
    let mut stats = TranslateStats::default();

    for line in DumpLines::new(reader) {
        let line = line?;
        stats.lines_read += 1;
        write_result(transducer.translate_raw_line(&line), &mut writer, &mut stats)?;
    }

    writer.flush()?;
    Ok(stats)
}

fn write_result<W: Write>(
    result: TransformResult<Vec<u8>>,
    writer: &mut W,
    stats: &mut TranslateStats,
) -> io::Result<()> {
    let mut written = 0;
    for out in result {
        writer.write_all(&out)?;
        writer.write_all(b"\n")?;
        written += 1;
    }

    if written == 0 {
        stats.lines_dropped += 1;
    }
    stats.lines_emitted += written;
    Ok(())
}
