//! Synthetic GIF byte streams.

/// Builder for small, structurally valid GIF containers.
///
/// Frames carry a tiny LZW payload; they are not meant to decode to pixels,
/// only to satisfy a block walker.
#[derive(Debug, Clone)]
pub struct GifBuilder {
    width: u16,
    height: u16,
    frames: u32,
    gif87a: bool,
    target_len: Option<usize>,
}

impl GifBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            frames: 1,
            gif87a: false,
            target_len: None,
        }
    }

    pub fn frames(mut self, frames: u32) -> Self {
        self.frames = frames;
        self
    }

    pub fn gif87a(mut self) -> Self {
        self.gif87a = true;
        self
    }

    /// Pad with a comment extension until the stream is about `bytes` long.
    pub fn target_size(mut self, bytes: usize) -> Self {
        self.target_len = Some(bytes);
        self
    }

    /// Same as [`Self::target_size`] in KiB.
    pub fn target_kb(self, kb: usize) -> Self {
        self.target_size(kb * 1024)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.target_len.unwrap_or(64));
        out.extend_from_slice(if self.gif87a { b"GIF87a" } else { b"GIF89a" });
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        // Global table flag, 2 entries
        out.extend_from_slice(&[0x80, 0x00, 0x00]);
        out.extend_from_slice(&[0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF]);

        for _ in 0..self.frames {
            if self.frames > 1 && !self.gif87a {
                // Graphic control extension, 100ms delay
                out.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 0x0A, 0x00, 0x00, 0x00]);
            }
            out.push(0x2C);
            out.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
            out.extend_from_slice(&self.width.to_le_bytes());
            out.extend_from_slice(&self.height.to_le_bytes());
            out.push(0x00);
            out.push(0x02);
            out.extend_from_slice(&[0x02, 0x44, 0x01, 0x00]);
        }

        if let Some(target) = self.target_len {
            pad_with_comment(&mut out, target);
        }

        out.push(0x3B);
        out
    }
}

/// Append a comment extension so that `out.len() + 1` (trailer) lands close
/// to `target`.
fn pad_with_comment(out: &mut Vec<u8>, target: usize) {
    // introducer + label + terminator + trailer
    let overhead = out.len() + 4;
    if target <= overhead + 1 {
        return;
    }
    let mut remaining = target - overhead;

    out.extend_from_slice(&[0x21, 0xFE]);
    while remaining > 1 {
        let chunk = (remaining - 1).min(255);
        out.push(chunk as u8);
        out.extend(std::iter::repeat(b'.').take(chunk));
        remaining -= chunk + 1;
    }
    out.push(0x00);
}

/// Drop the trailer byte from a well-formed stream.
pub fn without_trailer(mut bytes: Vec<u8>) -> Vec<u8> {
    if bytes.last() == Some(&0x3B) {
        bytes.pop();
    }
    bytes
}

/// Replace the trailer with an arbitrary block introducer.
pub fn with_stray_block(mut bytes: Vec<u8>, introducer: u8) -> Vec<u8> {
    if let Some(last) = bytes.last_mut() {
        *last = introducer;
    }
    bytes
}
