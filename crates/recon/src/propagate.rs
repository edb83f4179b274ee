//! Field propagation from tested controls into their documented counterparts.

use crate::config::TrackingConfig;
use crate::error::ReconError;
use crate::grid::Grid;
use crate::layout::{detect_variant, normalize, SheetRole};
use crate::model::{MappingRow, PropagationSummary, RowOutcome};
use crate::reconcile::read_mapping;
use crate::runlog::SEPARATOR;
use crate::session::Session;
use crate::store::DocumentStore;
use crate::template::{field_copies, TemplateMap};
use crate::tracking::{update_tracking, TrackingUpdate};
use crate::verify::verify_cells;

/// Sheets of the control book a propagation run reads and writes.
pub struct PropagateTarget<'a> {
    pub book: &'a str,
    pub mapping_sheet: &'a str,
    pub tracking_sheet: &'a str,
}

/// Apply every mapping row in order.
///
/// A missing mapping or tracking sheet aborts the run. Any per-row problem
/// (an unopenable file, an unrecognized layout) skips that row and the run
/// carries on with the next one.
pub fn propagate<S: DocumentStore>(
    session: &mut Session<'_, S>,
    target: &PropagateTarget<'_>,
    config: &TrackingConfig,
) -> Result<PropagationSummary, ReconError> {
    let rows = read_mapping(session.store.sheet(target.book, target.mapping_sheet)?);
    session.store.sheet(target.book, target.tracking_sheet)?;

    let mut summary = PropagationSummary::default();
    for row in &rows {
        let outcome = propagate_row(session, row, target, config)?;
        summary.outcomes.push((row.matched_name.clone(), outcome));
    }

    log::info!(
        "propagation finished: {} updated, {} skipped",
        summary.updated(),
        summary.skipped()
    );
    Ok(summary)
}

fn propagate_row<S: DocumentStore>(
    session: &mut Session<'_, S>,
    row: &MappingRow,
    target: &PropagateTarget<'_>,
    config: &TrackingConfig,
) -> Result<RowOutcome, ReconError> {
    let store = &mut *session.store;
    let log = &mut *session.log;
    let prompter = &mut *session.prompter;

    log.info(SEPARATOR);
    log.info(&format!("Current control: {}", row.matched_name));
    log.info(&format!("Source sheet: {}", row.source_sheet));
    log.info(&format!("Destination sheet: {}", row.dest_sheet));

    let ends = [
        (SheetRole::Source, &row.source_id, &row.source_sheet),
        (SheetRole::Destination, &row.dest_id, &row.dest_sheet),
    ];
    for (role, id, sheet) in ends {
        if let Err(e) = store.sheet(id, sheet) {
            let msg = format!("could not open the {role} file with ID \"{id}\" and sheet \"{sheet}\": {e}");
            log.error(&msg);
            prompter.alert(&format!("ERROR: {msg}"));
            return Ok(RowOutcome::Skipped { reason: msg });
        }
    }

    let source_variant = {
        let sheet = store.sheet_mut(&row.source_id, &row.source_sheet)?;
        normalize(sheet, SheetRole::Source, log);
        detect_variant(sheet)
    };
    let dest_variant = {
        let sheet = store.sheet_mut(&row.dest_id, &row.dest_sheet)?;
        normalize(sheet, SheetRole::Destination, log);
        detect_variant(sheet)
    };

    let (Some(source_map), Some(dest_map)) = (
        TemplateMap::for_variant(source_variant),
        TemplateMap::for_variant(dest_variant),
    ) else {
        let msg = format!(
            "REVIEW: control \"{}\" skipped, layout not recognized (source: {source_variant}, destination: {dest_variant}).",
            row.matched_name
        );
        log.error(&msg);
        return Ok(RowOutcome::Skipped { reason: msg });
    };

    let source = store.sheet(&row.source_id, &row.source_sheet)?.clone();
    let dest = store.sheet_mut(&row.dest_id, &row.dest_sheet)?;
    let mut copied = Vec::new();

    for spec in field_copies(&source_map, &dest_map) {
        if !source.has_values(&spec.source.range) {
            continue;
        }
        dest.set_values(&spec.dest.range, &source.values(&spec.source.range))?;
        let source_label = source.text(spec.source.label);
        log.info(&format!(
            "Copied field \"{source_label}\" from the source sheet to field \"{}\" of the destination sheet.",
            dest.text(spec.dest.label)
        ));
        copied.push(source_label);
    }

    // The sample size is compared including its type: 3 and "3" differ.
    let sample = source.value(source_map.sample_value());
    if sample != dest.value(dest_map.sample_value()) {
        dest.set_value(dest_map.sample_value(), sample)?;
        let source_label = source.text(source_map.sample_label());
        log.info(&format!(
            "Copied field \"{source_label}\" from the source sheet to field \"{}\" of the destination sheet.",
            dest.text(dest_map.sample_label())
        ));
        copied.push(source_label);
    }

    verify_cells(dest, &dest_map, log);

    let update = TrackingUpdate {
        control: &row.matched_name,
        copied: &copied,
        frequency: dest.text(dest_map.frequency()),
        sample_size: dest.text(dest_map.sample_value()),
    };
    let tracking = store.sheet_mut(target.book, target.tracking_sheet)?;
    let tracked = update_tracking(tracking, config, &update)? > 0;
    if tracked {
        log.info(&format!(
            "Tracking row updated with {} and copied fields for \"{}\".",
            config.ok_marker, row.dest_sheet
        ));
    }

    Ok(RowOutcome::Updated { copied, tracked })
}
