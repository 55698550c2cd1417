//! CSV export of step responses and pole sets
//!
//! # CSV Format
//!
//! ```csv
//! time [s],case 1,case 2
//! 0,0,0
//! 0.05005005005005005,0.1569,0.2667
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::simulation::StepResponse;

/// Append `.csv` unless the path already ends with it (case-insensitive)
pub fn with_csv_extension(path: &Path) -> PathBuf {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".csv");
        PathBuf::from(name)
    }
}

/// Write one response as `time [s],<label>` rows
pub fn write_response_csv<W: Write>(writer: W, response: &StepResponse, label: &str) -> Result<()> {
    write_responses_csv(writer, &[(label, response)])
}

/// Write several responses sharing one time grid, one column per response
///
/// # Errors
///
/// `InvalidInput` I/O error if the responses do not share the time grid of
/// the first one.
pub fn write_responses_csv<W: Write>(writer: W, responses: &[(&str, &StepResponse)]) -> Result<()> {
    let time: &[f64] = match responses.first() {
        Some((_, first)) => first.time(),
        None => &[],
    };
    for (label, response) in responses {
        if response.time() != time {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("response '{}' does not share the common time grid", label),
            )
            .into());
        }
    }

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["time [s]".to_string()];
    header.extend(responses.iter().map(|(label, _)| label.to_string()));
    wtr.write_record(&header)?;

    for (i, t) in time.iter().enumerate() {
        let mut record = vec![t.to_string()];
        record.extend(responses.iter().map(|(_, r)| r.output()[i].to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write poles as `real,imag` rows
pub fn write_poles_csv<W: Write>(writer: W, poles: &[num_complex::Complex64]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["real", "imag"])?;
    for p in poles {
        wtr.write_record([p.re.to_string(), p.im.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save one response to a CSV file, returning the path written
pub fn save_response_csv(path: impl AsRef<Path>, response: &StepResponse, label: &str) -> Result<PathBuf> {
    let path = with_csv_extension(path.as_ref());
    let file = std::fs::File::create(&path)?;
    write_response_csv(file, response, label)?;
    Ok(path)
}

/// Save a pole set to a CSV file, returning the path written
pub fn save_poles_csv(path: impl AsRef<Path>, poles: &[num_complex::Complex64]) -> Result<PathBuf> {
    let path = with_csv_extension(path.as_ref());
    let file = std::fs::File::create(&path)?;
    write_poles_csv(file, poles)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use num_complex::Complex64;

    #[test]
    fn test_response_csv() {
        let r = StepResponse::new(vec![0.0, 0.5, 1.0], vec![0.0, 0.25, 1.0]);
        let mut buffer = Vec::new();
        write_response_csv(&mut buffer, &r, "case 1").unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time [s],case 1");
        assert_eq!(lines[1], "0,0");
        assert_eq!(lines[2], "0.5,0.25");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_responses_csv_grid_mismatch() {
        let a = StepResponse::new(vec![0.0, 1.0], vec![0.0, 1.0]);
        let b = StepResponse::new(vec![0.0, 2.0], vec![0.0, 1.0]);
        let err = write_responses_csv(Vec::new(), &[("a", &a), ("b", &b)]).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_poles_csv() {
        let mut buffer = Vec::new();
        write_poles_csv(&mut buffer, &[Complex64::new(-0.5, 0.25), Complex64::new(-3.5, 0.0)]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "real,imag\n-0.5,0.25\n-3.5,0\n");
    }

    #[test]
    fn test_csv_extension() {
        assert_eq!(with_csv_extension(Path::new("out")), PathBuf::from("out.csv"));
        assert_eq!(with_csv_extension(Path::new("out.CSV")), PathBuf::from("out.CSV"));
        assert_eq!(with_csv_extension(Path::new("run.1")), PathBuf::from("run.1.csv"));
    }
}
