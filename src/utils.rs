//! Utility routines for loading score files.
use ndarray::prelude::*;
use ndarray_npy::read_npy;
use csv::ReaderBuilder;
use std::path::Path;

use crate::errors::NllError;

/// Loads one score per trace from `fname`.
///
/// `.npy` files may hold f32 or f64 values, either as a vector or as a
/// single-column matrix (the shape of a sigmoid output layer). Any other
/// extension is read as headerless CSV, whose first column is the score.
pub fn load_scores(fname: &str) -> Result<Array1<f64>, NllError> {
    let scores = match Path::new(fname).extension().and_then(|e| e.to_str()) {
        Some("npy") => load_npy_scores(fname)?,
        _ => load_csv_scores(fname)?,
    };
    info!("loaded {} scores from {}", scores.len(), fname);
    Ok(scores)
}

fn load_npy_scores(fname: &str) -> Result<Array1<f64>, NllError> {
    if let Ok(a) = read_npy::<_, Array1<f64>>(fname) {
        return Ok(a);
    }
    if let Ok(a) = read_npy::<_, Array1<f32>>(fname) {
        return Ok(a.mapv(f64::from));
    }
    let matrix = match read_npy::<_, Array2<f64>>(fname) {
        Ok(a) => a,
        Err(_) => read_npy::<_, Array2<f32>>(fname)
                      .map(|a| a.mapv(f64::from))
                      .map_err(|e| NllError::Load { path: fname.to_string(),
                                                    reason: e.to_string() })?,
    };
    single_column(matrix, fname)
}

fn single_column(matrix: Array2<f64>, fname: &str) -> Result<Array1<f64>, NllError> {
    if matrix.ncols() != 1 {
        return Err(NllError::Load {
            path: fname.to_string(),
            reason: format!("expected one score per row, found {} columns", matrix.ncols()),
        });
    }
    Ok(matrix.column(0).to_owned())
}

fn load_csv_scores(fname: &str) -> Result<Array1<f64>, NllError> {
    let mut reader = ReaderBuilder::new()
                                   .has_headers(false)
                                   .from_path(fname)?;

    let mut scores = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        let score = record.get(0)
                          .and_then(|x| x.trim().parse::<f64>().ok())
                          .ok_or_else(|| NllError::Load {
                              path: fname.to_string(),
                              reason: format!("no score at line {}: {:?}", line + 1, record),
                          })?;
        scores.push(score);
    }
    Ok(Array::from(scores))
}

/// Keeps the first `n` scores, if `n` is given.
pub fn keep_first(scores: Array1<f64>, n: Option<usize>) -> Array1<f64> {
    match n {
        Some(n) if n < scores.len() => scores.slice(s![..n]).to_owned(),
        _ => scores,
    }
}

/// Parses accuracy targets specified as comma-separated values.
pub fn parse_targets(targets: &str) -> Result<Vec<f64>, NllError> {
    targets.split(',')
           .map(|s| match s.trim().parse::<f64>() {
               Ok(t) if (0. ..=1.).contains(&t) => Ok(t),
               _ => Err(NllError::InvalidConfig(format!("invalid accuracy target: {:?}", s))),
           })
           .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_npy::write_npy;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn npy_vectors_and_columns() {
        let dir = tempdir().unwrap();

        let path = dir.path().join("v64.npy");
        write_npy(&path, &array![0.1f64, 0.7, 0.3]).unwrap();
        assert_eq!(load_scores(path.to_str().unwrap()).unwrap(), array![0.1, 0.7, 0.3]);

        let path = dir.path().join("c32.npy");
        write_npy(&path, &array![[0.5f32], [0.25], [1.]]).unwrap();
        assert_eq!(load_scores(path.to_str().unwrap()).unwrap(), array![0.5, 0.25, 1.]);

        let path = dir.path().join("wide.npy");
        write_npy(&path, &array![[0.5f64, 0.1], [0.25, 0.2]]).unwrap();
        match load_scores(path.to_str().unwrap()) {
            Err(NllError::Load { reason, .. }) => assert!(reason.contains("2 columns")),
            other => panic!("expected a load error, got {:?}", other),
        }
    }

    #[test]
    fn csv_first_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        fs::write(&path, "0.9, 1\n 0.2,0\n0.35,1\n").unwrap();
        assert_eq!(load_scores(path.to_str().unwrap()).unwrap(), array![0.9, 0.2, 0.35]);

        fs::write(&path, "0.9\nabc\n").unwrap();
        assert!(load_scores(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn missing_file() {
        assert!(load_scores("/nonexistent/fixed.npy").is_err());
        assert!(load_scores("/nonexistent/fixed.csv").is_err());
    }

    #[test]
    fn truncation() {
        let a = array![1., 2., 3., 4.];
        assert_eq!(keep_first(a.clone(), Some(2)), array![1., 2.]);
        assert_eq!(keep_first(a.clone(), Some(10)), a);
        assert_eq!(keep_first(a.clone(), None), a);
    }

    #[test]
    fn targets() {
        assert_eq!(parse_targets("0.9").unwrap(), vec![0.9]);
        assert_eq!(parse_targets("0.6, 0.99,1").unwrap(), vec![0.6, 0.99, 1.]);
        assert!(parse_targets("1.5").is_err());
        assert!(parse_targets("0.5,x").is_err());
    }
}
