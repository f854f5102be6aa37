//! Batch host: one session per unit, run on a worker pool
//!
//! Each unit gets its own transaction. A routed unit is committed; an error
//! escaping the processor rolls its session back and is reported instead.

use anyhow::Context;
use indexmap::IndexMap;
use rayon::prelude::*;
use sentiment_core::{InMemorySession, Relationship, SentimentProcessor, UnitId, WorkUnit};
use serde::Serialize;
use std::io::BufRead;

/// One output line per input unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    /// Unit committed to a relationship
    Routed {
        id: UnitId,
        route: Relationship,
        attributes: IndexMap<String, String>,
    },
    /// Session rolled back
    RolledBack { id: UnitId, error: String },
}

/// Read JSON-lines work units; blank lines are skipped
///
/// # Errors
/// - I/O failures and malformed lines, with the line number
pub fn read_units(reader: impl BufRead) -> anyhow::Result<Vec<WorkUnit>> {
    let mut units = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let unit: WorkUnit = serde_json::from_str(&line)
            .with_context(|| format!("parsing work unit on line {}", index + 1))?;
        units.push(unit);
    }
    Ok(units)
}

/// Run one unit through the processor in its own session
pub fn process_unit(processor: &SentimentProcessor, unit: WorkUnit) -> Report {
    let id = unit.id;
    let mut session = InMemorySession::with_units([unit]);

    match processor.on_trigger(&mut session) {
        Ok(outcome) => {
            session.commit();
            match session.committed().last() {
                Some(transfer) => Report::Routed {
                    id: transfer.unit.id,
                    route: outcome.relationship,
                    attributes: transfer.unit.attributes.clone(),
                },
                None => Report::RolledBack {
                    id,
                    error: "processor returned without a transfer".to_string(),
                },
            }
        }
        Err(e) => {
            session.rollback();
            Report::RolledBack {
                id,
                error: e.to_string(),
            }
        }
    }
}

/// Process `units` on a pool of `workers` threads, preserving input order
///
/// # Errors
/// - The worker pool cannot be created
pub fn process_all(
    processor: &SentimentProcessor,
    units: Vec<WorkUnit>,
    workers: usize,
) -> anyhow::Result<Vec<Report>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("sentiment-worker-{i}"))
        .build()
        .context("building worker pool")?;

    tracing::info!(units = units.len(), workers, "processing batch");
    let reports: Vec<Report> =
        pool.install(|| units.into_par_iter().map(|u| process_unit(processor, u)).collect());

    let routed = |rel: Relationship| {
        reports
            .iter()
            .filter(|r| matches!(r, Report::Routed { route, .. } if *route == rel))
            .count()
    };
    tracing::info!(
        success = routed(Relationship::Success),
        failure = routed(Relationship::Failure),
        rolled_back = reports.iter().filter(|r| matches!(r, Report::RolledBack { .. })).count(),
        "batch complete"
    );
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sentiment_core::{ProcessorConfig, SENTIMENT_ATTRIBUTE};
    use sentiment_test_utils::{setup_processor, ScriptedPipeline};
    use std::io::Cursor;
    use std::sync::Arc;

    #[test]
    fn reads_jsonl_with_defaults() {
        let input = "{\"attributes\": {\"sentence\": \"Hi there.\"}}\n\n{\"content\": \"raw\"}\n";
        let units = read_units(Cursor::new(input)).unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].attribute("sentence"), Some("Hi there."));
        assert!(units[1].attributes.is_empty());
        assert_eq!(units[1].content, "raw");
        assert_ne!(units[0].id, units[1].id);
    }

    #[test]
    fn malformed_line_names_line_number() {
        let err = read_units(Cursor::new("{}\nnot json\n")).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn batch_keeps_order_and_routes() {
        let pipeline = Arc::new(ScriptedPipeline::whitespace());
        let processor = setup_processor(ProcessorConfig::new(), pipeline.clone());
        let units = vec![
            WorkUnit::new().with_attribute("sentence", "The food was great."),
            WorkUnit::new(),
            WorkUnit::new().with_attribute("sentence", "Service was slow."),
        ];
        let ids: Vec<UnitId> = units.iter().map(|u| u.id).collect();

        let reports = process_all(&processor, units, 2).unwrap();

        let routes: Vec<(UnitId, Relationship)> = reports
            .iter()
            .map(|r| match r {
                Report::Routed { id, route, .. } => (*id, *route),
                Report::RolledBack { error, .. } => panic!("unexpected rollback: {error}"),
            })
            .collect();
        assert_eq!(
            routes,
            vec![
                (ids[0], Relationship::Success),
                (ids[1], Relationship::Failure),
                (ids[2], Relationship::Success),
            ]
        );
        assert_eq!(pipeline.call_count(), 2);
    }

    #[test]
    fn routed_report_carries_result_attributes() {
        let processor = setup_processor(
            ProcessorConfig::new(),
            Arc::new(ScriptedPipeline::whitespace()),
        );
        let report = process_unit(
            &processor,
            WorkUnit::new().with_attribute("sentence", "Lovely weather."),
        );

        let Report::Routed { attributes, .. } = report else {
            panic!("expected routed report");
        };
        assert_eq!(attributes["mime.type"], "application/json");
        assert!(attributes[SENTIMENT_ATTRIBUTE].contains("\"Lovely\""));
    }

    #[test]
    fn report_json_shape() {
        let id = UnitId::new();
        let line = serde_json::to_value(Report::RolledBack {
            id,
            error: "session closed".into(),
        })
        .unwrap();
        assert_eq!(line["id"], id.to_string());
        assert_eq!(line["error"], "session closed");

        let line = serde_json::to_value(Report::Routed {
            id,
            route: Relationship::Failure,
            attributes: IndexMap::new(),
        })
        .unwrap();
        assert_eq!(line["route"], "failure");
    }
}
