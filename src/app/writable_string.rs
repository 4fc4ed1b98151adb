use std::io::{Error, ErrorKind, Write};

/// A `String` that can be used as a `std::io::Write`.
///
/// Used to get the help messages built by clap before sending them to the logger.
#[derive(Default)]
pub(crate) struct WritableString(String);

impl WritableString {
    /// Returns the lines written so far.
    pub(crate) fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }
}

impl Write for WritableString {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let s = std::str::from_utf8(buf).map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
        self.0.push_str(s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines() {
        let mut s = WritableString::default();
        write!(s, "abc\nde").unwrap();
        writeln!(s, "f").unwrap();
        s.flush().unwrap();
        assert_eq!(vec!["abc", "def"], s.lines().collect::<Vec<&str>>());
    }

    #[test]
    fn test_invalid_utf8() {
        let mut s = WritableString::default();
        assert!(s.write(&[0xff, 0xfe]).is_err());
        assert_eq!(0, s.lines().count());
    }
}
