//! Name-addressed uniform block backing `ShaderConstantSink`.

use crate::postfx::ShaderConstantSink;

/// Scalar constants packed into 4-byte slots in declaration order.
///
/// The block is padded to 16 bytes, the uniform buffer granularity.
#[derive(Debug, Clone)]
pub(crate) struct ConstantBlock {
    names: Vec<String>,
    bytes: Vec<u8>,
    warned_unknown: bool,
}

impl ConstantBlock {
    pub(crate) fn new(names: &[&str]) -> Self {
        let size = Self::size_for(names.len());
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            bytes: vec![0; size as usize],
            warned_unknown: false,
        }
    }

    /// Buffer size for `count` scalar slots.
    pub(crate) fn size_for(count: usize) -> u64 {
        ((count.max(1) * 4).div_ceil(16) * 16) as u64
    }

    pub(crate) fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn write(&mut self, name: &str, words: &[[u8; 4]]) {
        let Some(slot) = self.names.iter().position(|n| n == name) else {
            if !self.warned_unknown {
                log::debug!("ConstantBlock: unknown constant {name:?} ignored");
                self.warned_unknown = true;
            }
            return;
        };

        for (i, word) in words.iter().enumerate() {
            let start = (slot + i) * 4;
            let Some(dst) = self.bytes.get_mut(start..start + 4) else { break };
            dst.copy_from_slice(word);
        }
    }
}

impl ShaderConstantSink for ConstantBlock {
    fn set_pixel_f32(&mut self, name: &str, values: &[f32]) {
        let words: Vec<[u8; 4]> = values.iter().map(|v| v.to_ne_bytes()).collect();
        self.write(name, &words);
    }

    fn set_pixel_i32(&mut self, name: &str, values: &[i32]) {
        let words: Vec<[u8; 4]> = values.iter().map(|v| v.to_ne_bytes()).collect();
        self.write(name, &words);
    }
}
