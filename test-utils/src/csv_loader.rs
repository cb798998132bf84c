use std::error::Error;

use csv::Reader;
use num_enum::TryFromPrimitive;

#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum CsvFileColumn {
    Timestamp,
    XAccel,
    YAccel,
    ZAccel,
    XGyro,
    YGyro,
    ZGyro,
    HeartRate,
}

impl From<CsvFileColumn> for usize {
    fn from(value: CsvFileColumn) -> Self {
        value as usize
    }
}

#[derive(Clone, Debug, Default)]
pub struct CsvColumnMapper {
    columns: Vec<usize>,
}

impl CsvColumnMapper {
    pub fn new() -> Self {
        Self { columns: vec![] }
    }

    /// Builds a mapper from raw indices, rejecting indices the fixture layout lacks.
    pub fn from_indices(indices: &[usize]) -> Result<Self, Box<dyn Error>> {
        let columns = indices
            .iter()
            .map(|&i| {
                CsvFileColumn::try_from(i)
                    .map(usize::from)
                    .map_err(|_| format!("Unknown column index {}", i).into())
            })
            .collect::<Result<Vec<usize>, Box<dyn Error>>>()?;
        Ok(Self { columns })
    }

    pub fn columns(&self) -> Vec<usize> {
        self.columns.clone()
    }

    pub fn add_timestamp(&mut self) -> &mut Self {
        self.columns.push(CsvFileColumn::Timestamp.into());
        self
    }

    pub fn add_accel(&mut self) -> &mut Self {
        self.columns.push(CsvFileColumn::XAccel.into());
        self.columns.push(CsvFileColumn::YAccel.into());
        self.columns.push(CsvFileColumn::ZAccel.into());
        self
    }

    pub fn add_gyro(&mut self) -> &mut Self {
        self.columns.push(CsvFileColumn::XGyro.into());
        self.columns.push(CsvFileColumn::YGyro.into());
        self.columns.push(CsvFileColumn::ZGyro.into());
        self
    }

    pub fn add_heart_rate(&mut self) -> &mut Self {
        self.columns.push(CsvFileColumn::HeartRate.into());
        self
    }
}

pub fn load_csv(file_path: &str) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    let mut rdr = Reader::from_path(file_path)?;
    let mut data = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row: Vec<f64> = record
            .iter()
            .filter_map(|s| s.trim().parse::<f64>().ok())
            .collect();
        data.push(row);
    }

    Ok(data)
}

pub fn load_csv_columns<T: TryFrom<Vec<f64>>>(
    file_path: &str,
    columns: &[usize],
) -> Result<Vec<T>, Box<dyn Error>> {
    if columns.is_empty() {
        return Err("No columns provided".into());
    }

    let data = load_csv(file_path)?;

    let result = data
        .into_iter()
        .map(|rows| {
            columns
                .iter()
                .map(|&i| {
                    rows.get(i)
                        .ok_or_else(|| format!("Column index {} out of bounds", i).into())
                        .copied()
                })
                .collect::<Result<Vec<f64>, Box<dyn Error>>>()
        })
        .collect::<Result<Vec<Vec<f64>>, Box<dyn Error>>>()?
        .into_iter()
        .map(|f64_values| {
            T::try_from(f64_values).map_err(|_| "Failed to convert to T".to_string().into())
        })
        .collect::<Result<Vec<T>, Box<dyn Error>>>()?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TILT_READINGS;
    use common::{Payload, Sample};

    #[test]
    fn test_read_csv() {
        let data = load_csv(TILT_READINGS).unwrap();
        assert_eq!(data.len(), 50);
        assert_eq!(data[0].len(), 8);
    }

    #[test]
    #[should_panic(expected = "No such file or directory")]
    fn test_read_inexistent_csv() {
        let _ = load_csv("./test_data/tilt_readingss.csv").unwrap();
    }

    #[test]
    fn test_load_timestamp_and_accel() {
        let mut mapper = CsvColumnMapper::new();
        mapper.add_timestamp().add_accel();
        let data = load_csv_columns::<Vec<f64>>(TILT_READINGS, &mapper.columns()).unwrap();

        assert_eq!(data[0].len(), 4);
        assert_eq!(data[1][0], 20.0);
    }

    #[test]
    fn test_mapper_order_is_kept() {
        let mut mapper = CsvColumnMapper::new();
        mapper.add_gyro().add_timestamp();
        assert_eq!(mapper.columns(), vec![4, 5, 6, 0]);
    }

    #[test]
    fn test_mapper_from_indices() {
        let mapper = CsvColumnMapper::from_indices(&[0, 7]).unwrap();
        assert_eq!(mapper.columns(), vec![0, 7]);
        assert!(CsvColumnMapper::from_indices(&[0, 8]).is_err());
    }

    #[test]
    #[should_panic]
    fn test_load_csv_incorrect_columns() {
        load_csv_columns::<Vec<f64>>(TILT_READINGS, &[0, 1, 20]).unwrap();
    }

    #[test]
    fn test_load_csv_as_samples() {
        let mut mapper = CsvColumnMapper::new();
        mapper.add_timestamp().add_accel();
        let accel = load_csv_columns::<Sample>(TILT_READINGS, &mapper.columns()).unwrap();
        assert!(matches!(accel[0].payload(), Payload::Orientation(_)));

        let mut mapper = CsvColumnMapper::new();
        mapper.add_timestamp().add_heart_rate();
        let heart_rate = load_csv_columns::<Sample>(TILT_READINGS, &mapper.columns()).unwrap();
        assert_eq!(heart_rate[0].bpm(), Some(70));
    }

    #[test]
    #[should_panic(expected = "Failed to convert to T")]
    fn test_fail_load_csv_as_sample() {
        load_csv_columns::<Sample>(TILT_READINGS, &[0, 1, 2]).unwrap();
    }
}
