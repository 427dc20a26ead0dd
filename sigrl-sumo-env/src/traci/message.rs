//! Encoding of TraCI messages.
//!
//! A message is a big-endian `i32` holding its total length (the length field
//! included) followed by commands. A command is its length, its identifier and a
//! payload. The length is one byte, or a zero byte followed by an `i32` when it
//! exceeds 255.
use crate::SimError;

/// Appends one command to `buf`.
pub fn put_command(buf: &mut Vec<u8>, id: u8, payload: &[u8]) {
    let len = payload.len() + 2;
    if len <= 255 {
        buf.push(len as u8);
    } else {
        buf.push(0);
        buf.extend_from_slice(&((len + 4) as i32).to_be_bytes());
    }
    buf.push(id);
    buf.extend_from_slice(payload);
}

/// Wraps encoded commands into a message.
pub fn frame(commands: &[u8]) -> Vec<u8> {
    let mut msg = Vec::with_capacity(commands.len() + 4);
    msg.extend_from_slice(&((commands.len() + 4) as i32).to_be_bytes());
    msg.extend_from_slice(commands);
    msg
}

/// Appends a length-prefixed string.
pub fn put_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as i32).to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
}

/// Appends a list of strings.
#[cfg(test)]
pub fn put_string_list(buf: &mut Vec<u8>, list: &[String]) {
    buf.extend_from_slice(&(list.len() as i32).to_be_bytes());
    for s in list {
        put_string(buf, s);
    }
}

/// Cursor over the body of a received message.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SimError> {
        if self.buf.len() - self.pos < n {
            return Err(SimError::Protocol(format!(
                "expected {} more bytes at offset {}, message has {}",
                n,
                self.pos,
                self.buf.len()
            )));
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, SimError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i32(&mut self) -> Result<i32, SimError> {
        let mut b = [0u8; 4];
        b.copy_from_slice(self.take(4)?);
        Ok(i32::from_be_bytes(b))
    }

    fn read_len(&mut self) -> Result<usize, SimError> {
        let n = self.read_i32()?;
        if n < 0 {
            return Err(SimError::Protocol(format!("negative length {}", n)));
        }
        Ok(n as usize)
    }

    pub fn read_string(&mut self) -> Result<String, SimError> {
        let n = self.read_len()?;
        let bytes = self.take(n)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| SimError::Protocol(format!("invalid string: {}", e)))
    }

    pub fn read_string_list(&mut self) -> Result<Vec<String>, SimError> {
        let n = self.read_len()?;
        (0..n).map(|_| self.read_string()).collect()
    }

    /// Reads the length field of a command and returns the length of the rest of it.
    pub fn read_command_len(&mut self) -> Result<usize, SimError> {
        let short = self.read_u8()? as usize;
        let (len, header) = if short == 0 {
            (self.read_len()?, 5)
        } else {
            (short, 1)
        };
        len.checked_sub(header)
            .ok_or_else(|| SimError::Protocol(format!("command length {} too short", len)))
    }

    /// Reads a type tag and checks it.
    pub fn expect_type(&mut self, expected: u8) -> Result<(), SimError> {
        let t = self.read_u8()?;
        if t != expected {
            return Err(SimError::Protocol(format!(
                "expected value type 0x{:02x}, got 0x{:02x}",
                expected, t
            )));
        }
        Ok(())
    }

    /// Bytes not read yet.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos.min(self.buf.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_command() {
        let mut buf = vec![];
        put_command(&mut buf, 0x02, &0f64.to_be_bytes());
        let msg = frame(&buf);

        assert_eq!(&msg[..4], &14i32.to_be_bytes());
        assert_eq!(msg[4], 10);
        assert_eq!(msg[5], 0x02);
        assert_eq!(msg.len(), 14);
    }

    #[test]
    fn test_long_command_length() {
        let payload = vec![7u8; 300];
        let mut buf = vec![];
        put_command(&mut buf, 0xa3, &payload);

        let mut rdr = Reader::new(&buf);
        assert_eq!(rdr.read_command_len().unwrap(), 301);
        assert_eq!(rdr.read_u8().unwrap(), 0xa3);
        assert_eq!(buf.len(), 306);
    }

    #[test]
    fn test_strings() {
        let mut buf = vec![];
        put_string(&mut buf, "0");
        put_string_list(&mut buf, &["e1".to_string(), "".to_string(), "e3".to_string()]);

        let mut rdr = Reader::new(&buf);
        assert_eq!(rdr.read_string().unwrap(), "0");
        assert_eq!(rdr.read_string_list().unwrap(), vec!["e1", "", "e3"]);
        assert!(rdr.rest().is_empty());
        assert!(matches!(rdr.read_u8(), Err(SimError::Protocol(_))));
    }
}
