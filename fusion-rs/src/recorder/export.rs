use common::{Payload, StreamId};

use crate::recorder::session::RecordingSession;

/// Aligns series of unequal length by index.
///
/// Row `i` holds the `i`-th element of every series, or `default` where a series is
/// shorter. The row count equals the longest series.
///
/// ```
/// use fusion_rs::recorder::zip_series;
///
/// let short = [1.0, 2.0, 3.0];
/// let long = [10.0, 20.0, 30.0, 40.0, 50.0];
/// let rows = zip_series(&[&short[..], &long[..]], 0.0);
///
/// assert_eq!(rows.len(), 5);
/// assert_eq!(rows[2], vec![3.0, 30.0]);
/// assert_eq!(rows[4], vec![0.0, 50.0]);
/// ```
pub fn zip_series<T: Clone>(series: &[&[T]], default: T) -> Vec<Vec<T>> {
    let rows = series.iter().map(|s| s.len()).max().unwrap_or(0);
    (0..rows)
        .map(|i| {
            series
                .iter()
                .map(|s| s.get(i).cloned().unwrap_or_else(|| default.clone()))
                .collect()
        })
        .collect()
}

/// Column-oriented view of a finalized session, ready to be written by an exporter.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl ExportTable {
    /// Flattens every recorded series into columns (a timestamp column followed by the
    /// value columns) and zips them by index, filling gaps with `0.0`.
    pub fn from_session(session: &RecordingSession) -> Self {
        let mut header = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();

        for stream_id in session.recorded_streams() {
            let series = session.stream(stream_id);
            header.push(format!("{}_timestamp", stream_id));
            columns.push(series.iter().map(|(t, _)| *t as f64).collect());
            for (index, name) in value_names(stream_id).iter().enumerate() {
                header.push(format!("{}_{}", stream_id, name));
                columns.push(
                    series
                        .iter()
                        .map(|(_, payload)| column_value(payload, index))
                        .collect(),
                );
            }
        }

        for (family, algorithm) in session.recorded_angles() {
            let series = session.angles(family, algorithm);
            header.push(format!("{}_{}_timestamp", family, algorithm));
            columns.push(series.iter().map(|(t, _)| *t as f64).collect());
            header.push(format!("{}_{}_degrees", family, algorithm));
            columns.push(series.iter().map(|(_, v)| *v as f64).collect());
        }

        let column_refs: Vec<&[f64]> = columns.iter().map(Vec::as_slice).collect();
        Self {
            header,
            rows: zip_series(&column_refs, 0.0),
        }
    }
}

fn value_names(stream_id: StreamId) -> &'static [&'static str] {
    match stream_id {
        StreamId::ExternalHeartRate => &["bpm"],
        _ => &["x", "y", "z"],
    }
}

fn column_value(payload: &Payload, index: usize) -> f64 {
    payload
        .columns()
        .get(index)
        .map(|v| *v as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Algorithm, AngleEstimate, Sample, SourceFamily, StreamEvent};

    #[test]
    fn test_zip_three_and_five() {
        let a = [1, 2, 3];
        let b = [10, 20, 30, 40, 50];
        let rows = zip_series(&[&a[..], &b[..]], -1);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], vec![1, 10]);
        assert_eq!(rows[2], vec![3, 30]);
        assert_eq!(rows[3], vec![-1, 40]);
        assert_eq!(rows[4], vec![-1, 50]);
    }

    #[test]
    fn test_zip_empty() {
        let rows: Vec<Vec<f64>> = zip_series(&[], 0.0);
        assert!(rows.is_empty());

        let empty: [f64; 0] = [];
        assert!(zip_series(&[&empty[..], &empty[..]], 0.0).is_empty());
    }

    #[test]
    fn test_export_table() {
        let mut session = RecordingSession::new(0, 1000);
        for t in [0, 10, 20] {
            session.append(&StreamEvent::Raw {
                stream_id: StreamId::ExternalHeartRate,
                sample: Sample::new(t, Payload::HeartRate(60 + t as u32)),
            });
        }
        session.append(&StreamEvent::Angle(AngleEstimate::new(
            SourceFamily::External,
            Algorithm::Ewma,
            4.5,
            10,
        )));

        let table = ExportTable::from_session(&session);
        assert_eq!(
            table.header,
            vec![
                "external_heart_rate_timestamp",
                "external_heart_rate_bpm",
                "external_ewma_timestamp",
                "external_ewma_degrees",
            ]
        );
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec![0.0, 60.0, 10.0, 4.5]);
        assert_eq!(table.rows[2], vec![20.0, 80.0, 0.0, 0.0]);
    }
}
