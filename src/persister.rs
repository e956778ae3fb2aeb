// Transcript persistence.
//
// Emits the merged transcript as a CSV table, one row per segment, for the
// downstream cleaning/translation stage. Serialization is lossless: fields
// containing delimiters, quotes, or newlines are quoted. The file is
// written once per run, never appended.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::PipelineError;
use crate::transcript::Transcript;

pub struct TranscriptPersister {
    path: PathBuf,
}

impl TranscriptPersister {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole transcript in one pass.
    pub fn persist(&self, transcript: &Transcript) -> Result<(), PipelineError> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "start,end,text,speaker_id")?;
        for segment in &transcript.segments {
            writeln!(
                writer,
                "{:.3},{:.3},{},{}",
                segment.start,
                segment.end,
                csv_field(&segment.text),
                csv_field(&segment.speaker_id)
            )?;
        }
        writer.flush()?;

        info!(
            "Wrote {} transcript rows to {}",
            transcript.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptSegment;

    #[test]
    fn test_plain_field_is_unquoted() {
        assert_eq!(csv_field("hello world"), "hello world");
    }

    #[test]
    fn test_special_fields_are_quoted_and_escaped() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_persist_writes_one_row_per_segment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.csv");

        let mut transcript = Transcript::new();
        let mut seg = TranscriptSegment::new(0.0, 2.5, "hello, there", vec![]);
        seg.speaker_id = "SPEAKER_01".to_string();
        transcript.append(vec![seg]);
        let mut seg = TranscriptSegment::new(2.5, 4.0, "bye", vec![]);
        seg.speaker_id = "SPEAKER_00".to_string();
        transcript.append(vec![seg]);

        TranscriptPersister::new(&path).persist(&transcript).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "start,end,text,speaker_id");
        assert_eq!(lines[1], "0.000,2.500,\"hello, there\",SPEAKER_01");
        assert_eq!(lines[2], "2.500,4.000,bye,SPEAKER_00");
    }
}
