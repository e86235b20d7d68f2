use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use crate::streams::arff::parser::{is_comment_or_empty, parse_header, parse_instance_values};
use std::fs::File;
use std::io::{BufRead, BufReader, Error, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug)]
pub struct ArffFileStream {
    path: PathBuf,
    reader: BufReader<File>,
    header: Arc<InstanceHeader>,
    data_start_pos: u64,
    next_line: Option<String>,
    finished: bool,
}

impl Stream for ArffFileStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn header_ref(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }

    fn has_more_instances(&self) -> bool {
        !self.finished || self.next_line.is_some()
    }

    /// Next parseable data line; malformed lines are logged and skipped.
    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        loop {
            let line = self.next_line.take()?;
            if let Err(e) = self.fill_next_line() {
                warn!(path = %self.path.display(), error = %e, "stopping ARFF stream after read error");
                self.finished = true;
                self.next_line = None;
            }

            match parse_instance_values(&self.header, &line) {
                Ok(values) => {
                    let inst = DenseInstance::new(Arc::clone(&self.header), values, 1.0);
                    return Some(Box::new(inst) as Box<dyn Instance>);
                }
                Err(e) => {
                    warn!(path = %self.path.display(), line = %line, error = %e, "skipping invalid ARFF data line");
                }
            }
        }
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.reader = BufReader::new(File::open(&self.path)?);
        self.reader.seek(SeekFrom::Start(self.data_start_pos))?;
        self.finished = false;
        self.next_line = None;
        self.fill_next_line()?;
        Ok(())
    }
}

impl ArffFileStream {
    /// Opens `path`; `class_index` of `None` selects the last attribute.
    pub fn new(path: PathBuf, class_index: Option<usize>) -> Result<Self, Error> {
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);

        let (header, data_start_pos) = parse_header(&mut reader, class_index)?;

        let mut stream = ArffFileStream {
            path,
            reader,
            header: Arc::new(header),
            data_start_pos,
            next_line: None,
            finished: false,
        };

        stream.fill_next_line()?;
        Ok(stream)
    }

    fn fill_next_line(&mut self) -> Result<(), Error> {
        if self.finished {
            self.next_line = None;
            return Ok(());
        }
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.reader.read_line(&mut line)?;
            if n == 0 {
                self.finished = true;
                self.next_line = None;
                return Ok(());
            }
            if !is_comment_or_empty(&line) {
                self.next_line = Some(line.trim().to_string());
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::AttributeKind;
    use std::fs;
    use std::io::ErrorKind;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn write_arff(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().expect("tempfile");
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    const WEATHER: &str = r#"%
@relation weather
@attribute outlook {sunny, overcast, rainy}
@attribute temperature numeric
@attribute humidity numeric
@attribute windy {TRUE, FALSE}
@attribute play {yes, no}
@data
sunny,85,85,FALSE,no
sunny,80,90,TRUE,no
% a comment between rows
overcast,83,86,FALSE,yes
rainy,70,96,FALSE,yes
?,75,?,TRUE,?
"#;

    #[test]
    fn parse_header_and_instances() {
        let tf = write_arff(WEATHER);
        let mut stream = ArffFileStream::new(tf.path().to_path_buf(), None).expect("open");
        let h = stream.header();
        assert_eq!(h.relation_name(), "weather");
        assert_eq!(h.number_of_attributes(), 5);
        assert_eq!(h.class_index(), 4);

        let inst1 = stream.next_instance().expect("inst1");
        let v1 = inst1.to_vec();
        assert_eq!(v1, vec![0.0, 85.0, 85.0, 1.0, 1.0]);

        for _ in 0..3 {
            stream.next_instance().unwrap();
        }

        let inst5 = stream.next_instance().unwrap();
        assert!(inst5.value_at_index(0).unwrap().is_nan());
        assert!(inst5.value_at_index(2).unwrap().is_nan());
        assert!(inst5.is_class_missing());
        assert!(!stream.has_more_instances());
        assert!(stream.next_instance().is_none());

        stream.restart().unwrap();
        let inst1_again = stream.next_instance().unwrap();
        assert_eq!(inst1_again.to_vec(), v1);
    }

    #[test]
    fn explicit_class_index() {
        let tf = write_arff(WEATHER);
        let stream = ArffFileStream::new(tf.path().to_path_buf(), Some(0)).unwrap();
        assert_eq!(stream.header().class_index(), 0);
    }

    #[test]
    fn date_attributes_are_read_as_epoch_millis() {
        let tf = write_arff(
            "@relation d\n@attribute when date 'yyyy-MM-dd'\n@attribute c {a, b}\n@data\n1970-01-02,a\n'1970-01-01',b\n",
        );
        let mut stream = ArffFileStream::new(tf.path().to_path_buf(), None).unwrap();
        assert_eq!(stream.header().attribute_kind(0), Some(AttributeKind::Date));
        assert_eq!(stream.next_instance().unwrap().to_vec(), vec![86_400_000.0, 0.0]);
        assert_eq!(stream.next_instance().unwrap().to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn new_missing_file_returns_err_not_found() {
        let err = ArffFileStream::new("no/such/file.arff".into(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn header_without_data_errors_unexpected_eof() {
        let tf = write_arff("@relation r\n@attribute a numeric\n");
        let err = ArffFileStream::new(tf.path().to_path_buf(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn nominal_domain_without_closing_brace_errors() {
        let tf = write_arff("@relation r\n@attribute outlook {sunny, rainy\n@data\nsunny\n");
        let err = ArffFileStream::new(tf.path().to_path_buf(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn invalid_lines_are_skipped() {
        let tf = write_arff(
            "@relation r\n@attribute a numeric\n@attribute b numeric\n@data\n1\nabc,2\n3,4\n",
        );
        let mut stream = ArffFileStream::new(tf.path().to_path_buf(), None).unwrap();
        assert_eq!(stream.next_instance().unwrap().to_vec(), vec![3.0, 4.0]);
        assert!(stream.next_instance().is_none());
    }

    #[test]
    fn only_invalid_lines_returns_none() {
        let tf = write_arff("@relation r\n@attribute x numeric\n@data\nabc\n");
        let mut stream = ArffFileStream::new(tf.path().to_path_buf(), None).unwrap();
        assert!(stream.next_instance().is_none());
        assert!(!stream.has_more_instances());
    }

    #[test]
    fn fill_next_line_when_finished_is_noop() {
        let tf = write_arff("@relation r\n@attribute a numeric\n@data\n1\n");
        let mut s = ArffFileStream::new(tf.path().to_path_buf(), None).unwrap();
        s.finished = true;
        s.next_line = Some("x".into());
        s.fill_next_line().unwrap();
        assert!(s.next_line.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn next_instance_sets_finished_on_io_error() {
        let tf = write_arff("@relation r\n@attribute a numeric\n@data\n1\n2\n");
        let mut s = ArffFileStream::new(tf.path().to_path_buf(), None).unwrap();
        let _ = s.next_instance().unwrap();
        let dir = tempdir().unwrap();
        s.reader = BufReader::new(File::open(dir.path()).unwrap());
        let _ = s.next_instance();
        assert!(s.finished);
        assert!(!s.has_more_instances());
    }

    #[test]
    #[cfg(not(windows))]
    fn restart_after_file_removed_returns_err() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.arff");
        fs::write(&path, "@relation r\n@attribute x numeric\n@data\n1\n").unwrap();
        let mut stream = ArffFileStream::new(path.clone(), None).unwrap();
        fs::remove_file(&path).unwrap();
        let err = stream.restart().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
