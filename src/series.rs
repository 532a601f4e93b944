use crate::errors::{self, ErrorKind};
use crate::model::{ChartPoint, ChartSeries, MetricsDocument, ProcessMetric, RawPair, RawSeries};
use crate::reader::parse_document;
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Converts `metrics.processes` of a host metrics document into chart series.
///
/// Keys are visited in document order. A key whose series is falsy (`null`,
/// `false`, `0`, `""`), empty, or not a list of pairs, directly or after
/// decoding an encoded string, produces no entry. A key without a known display
/// name still produces a series, just an unnamed one.
pub fn transform_to_series(doc: Option<&MetricsDocument>) -> errors::Result<Vec<ChartSeries>> {
    let processes = match doc
        .and_then(|d| d.metrics.as_ref())
        .and_then(|m| m.processes.as_ref())
    {
        Some(p) => p,
        None => return Ok(Vec::new()),
    };

    let mut series_array: Vec<ChartSeries> = Vec::with_capacity(processes.0.len());
    for (key, raw) in processes.iter() {
        let name = ProcessMetric::from_key(key).map(|m| m.display_name().to_owned());
        let pairs = match raw {
            Some(raw) => resolve_pairs(key, raw)?,
            None => None,
        };
        let pairs = match pairs {
            Some(p) if !p.is_empty() => p,
            _ => {
                debug!("Skipping `{key}`: no samples");
                continue;
            }
        };
        let data: Vec<ChartPoint> = pairs.iter().copied().map(ChartPoint::from).collect();
        series_array.push(ChartSeries { name, data });
    }
    Ok(series_array)
}

/// Parses a raw metrics document and transforms it. A literal `null` document yields no series.
pub fn transform_slice(bytes: &[u8]) -> errors::Result<Vec<ChartSeries>> {
    let doc = parse_document(bytes)?;
    transform_to_series(doc.as_ref())
}

fn resolve_pairs<'a>(key: &str, raw: &'a RawSeries) -> errors::Result<Option<Cow<'a, [RawPair]>>> {
    match raw {
        RawSeries::Pairs(pairs) => Ok(Some(Cow::Borrowed(pairs.as_slice()))),
        RawSeries::Encoded(text) if text.is_empty() => Ok(None),
        RawSeries::Encoded(text) => {
            let decoded = serde_json::from_str::<Value>(text).map_err(|source| {
                ErrorKind::EncodedSeries {
                    key: key.to_owned(),
                    source,
                }
            })?;
            Ok(pairs_from_value(key, &decoded).map(Cow::Owned))
        }
        RawSeries::Other(value) => Ok(pairs_from_value(key, value).map(Cow::Owned)),
    }
}

fn pairs_from_value(key: &str, value: &Value) -> Option<Vec<RawPair>> {
    if is_falsy(value) {
        return None;
    }
    match Vec::<RawPair>::deserialize(value) {
        Ok(pairs) => Some(pairs),
        Err(e) => {
            warn!("Skipping `{key}`: not a list of [value, timestamp] pairs: {e}");
            None
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    fn transform_json(v: serde_json::Value) -> errors::Result<Vec<ChartSeries>> {
        let doc: Option<MetricsDocument> = serde_json::from_value(v)?;
        transform_to_series(doc.as_ref())
    }

    fn points(xs: &[(f64, f64)]) -> Vec<ChartPoint> {
        xs.iter().map(|(x, y)| ChartPoint { x: *x, y: *y }).collect()
    }

    #[test]
    fn test_total_processes_series() -> errors::Result<()> {
        let out = transform_json(json!({"metrics":{"processes":{"proc_total":[[5,100],[7,160]]}}}))?;
        let expected = vec![ChartSeries {
            name: Some("Total Processes".to_owned()),
            data: points(&[(100.0, 5.0), (160.0, 7.0)]),
        }];
        assert_eq!(expected, out);
        Ok(())
    }

    #[test]
    fn test_absent_inputs_give_no_series() -> errors::Result<()> {
        assert!(transform_to_series(None)?.is_empty());
        assert!(transform_json(json!(null))?.is_empty());
        assert!(transform_json(json!({}))?.is_empty());
        assert!(transform_json(json!({"metrics": null}))?.is_empty());
        assert!(transform_json(json!({"metrics": {}}))?.is_empty());
        assert!(transform_json(json!({"metrics": {"processes": null}}))?.is_empty());
        assert!(transform_json(json!({"metrics": {"processes": {}}}))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_encoded_series_is_parsed() -> errors::Result<()> {
        let out = transform_json(json!({"metrics":{"processes":{"proc_run":"[[1,10],[2,20]]"}}}))?;
        let expected = vec![ChartSeries {
            name: Some("Processes Run".to_owned()),
            data: points(&[(10.0, 1.0), (20.0, 2.0)]),
        }];
        assert_eq!(expected, out);
        Ok(())
    }

    #[test]
    fn test_encoded_and_inline_agree() -> errors::Result<()> {
        let inline = transform_json(json!({"metrics":{"processes":{
            "proc_total":[[312,1700000000],[315,1700000015],[309,1700000030]]
        }}}))?;
        let encoded = transform_json(json!({"metrics":{"processes":{
            "proc_total":"[[312,1700000000],[315,1700000015],[309,1700000030]]"
        }}}))?;
        assert_eq!(inline, encoded);
        assert_eq!(3, inline[0].data.len());
        Ok(())
    }

    #[test]
    fn test_output_follows_document_order() -> errors::Result<()> {
        let out = transform_slice(
            br#"{"metrics":{"processes":{"proc_run":[[3,30]],"proc_total":[[90,30]]}}}"#,
        )?;
        let names: Vec<Option<&str>> = out.iter().map(|s| s.name.as_deref()).collect();
        assert_eq!(vec![Some("Processes Run"), Some("Total Processes")], names);
        Ok(())
    }

    #[test]
    fn test_unknown_key_gives_unnamed_series() -> errors::Result<()> {
        let out = transform_slice(
            br#"{"metrics":{"processes":{"proc_total":[[1,5]],"proc_blocked":[[0,5]]}}}"#,
        )?;
        assert_eq!(2, out.len());
        assert_eq!(None, out[1].name);
        assert_eq!(points(&[(5.0, 0.0)]), out[1].data);
        Ok(())
    }

    #[test]
    fn test_empty_values_are_skipped() -> errors::Result<()> {
        let out = transform_json(json!({"metrics":{"processes":{
            "a": null,
            "b": "",
            "c": "null",
            "d": [],
            "e": "[]",
            "proc_run": [[4,40]]
        }}}))?;
        assert_eq!(1, out.len());
        assert_eq!(Some("Processes Run".to_owned()), out[0].name);
        Ok(())
    }

    #[test]
    fn test_falsy_encoded_values_are_skipped() -> errors::Result<()> {
        let out = transform_json(json!({"metrics":{"processes":{
            "proc_total": [[1,1]],
            "proc_run": "0",
            "a": "false",
            "b": "\"\"",
            "c": " null "
        }}}))?;
        assert_eq!(1, out.len());
        assert_eq!(Some("Total Processes".to_owned()), out[0].name);
        Ok(())
    }

    #[test]
    fn test_unexpected_values_skip_only_their_key() -> errors::Result<()> {
        let out = transform_json(json!({"metrics":{"processes":{
            "proc_total": [[1,1]],
            "proc_run": 0,
            "flag": false,
            "other": {"a": 1},
            "count": 12,
            "short": [[1]],
            "encoded_object": "{\"a\":1}"
        }}}))?;
        let expected = vec![ChartSeries {
            name: Some("Total Processes".to_owned()),
            data: points(&[(1.0, 1.0)]),
        }];
        assert_eq!(expected, out);
        Ok(())
    }

    #[test]
    fn test_repeated_key_gives_one_series() -> errors::Result<()> {
        let out = transform_slice(
            br#"{"metrics":{"processes":{"proc_total":[[1,10]],"proc_total":[[2,20]]}}}"#,
        )?;
        assert_eq!(1, out.len());
        assert_eq!(points(&[(20.0, 2.0)]), out[0].data);
        Ok(())
    }

    #[test]
    fn test_series_json_matches_chart_format() -> errors::Result<()> {
        let out = transform_json(json!({"metrics":{"processes":{"proc_total":[[5,100],[7,160]]}}}))?;
        assert_eq!(
            r#"[{"name":"Total Processes","data":[{"x":100,"y":5},{"x":160,"y":7}]}]"#,
            serde_json::to_string(&out)?
        );
        Ok(())
    }

    #[test]
    fn test_malformed_encoded_series_names_key() {
        let err = transform_json(json!({"metrics":{"processes":{
            "proc_total":[[1,1]],
            "proc_run":"[[1,10],"
        }}}))
        .unwrap_err();
        match err.kind() {
            ErrorKind::EncodedSeries { key, .. } => assert_eq!("proc_run", key),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fractional_values_survive() -> errors::Result<()> {
        let out = transform_slice(br#"{"metrics":{"processes":{"proc_run":[[0.5,1700000000]]}}}"#)?;
        assert_eq!(points(&[(1700000000.0, 0.5)]), out[0].data);
        Ok(())
    }
}
