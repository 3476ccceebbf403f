use std::fs::File;
use std::io::{BufWriter, Write};

use crate::crypto::cipher_types::CipherOutput;

pub(crate) fn write_all(output: &mut CipherOutput, data: &[u8]) -> std::io::Result<()> {
    match output {
        CipherOutput::Buffer(buf) => {
            buf.extend_from_slice(data);
            Ok(())
        }
        CipherOutput::File(path) => {
            let mut writer = BufWriter::new(File::create(path.as_str())?);
            writer.write_all(data)?;
            writer.flush()
        }
    }
}
