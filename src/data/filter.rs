use super::model::{CurveError, CurveTable};

// ---------------------------------------------------------------------------
// Row completeness: which rows carry a value in every required curve
// ---------------------------------------------------------------------------

/// Return indices of rows where every required curve has a value.
///
/// * `required` empty → every curve in the table is required
/// * A required name that is not in the table → [`CurveError::CurveNotFound`]
pub fn complete_rows(table: &CurveTable, required: &[&str]) -> Result<Vec<usize>, CurveError> {
    let curves = if required.is_empty() {
        table.curves().collect::<Vec<_>>()
    } else {
        required
            .iter()
            .map(|name| table.get(name))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok((0..table.len())
        .filter(|&row| curves.iter().all(|c| c.values[row].is_some()))
        .collect())
}

/// Drop every row that is missing a value in a required curve.
///
/// This is the load-time cleaning step applied before analysis. The
/// derivations themselves never rely on it having run.
pub fn drop_incomplete_rows(table: &CurveTable, required: &[&str]) -> Result<CurveTable, CurveError> {
    let rows = complete_rows(table, required)?;
    if rows.len() == table.len() {
        return Ok(table.clone());
    }
    log::debug!(
        "Dropping {} of {} rows with missing values",
        table.len() - rows.len(),
        table.len()
    );
    table.select_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Curve;

    fn gappy_table() -> CurveTable {
        CurveTable::new(
            vec![10.0, 11.0, 12.0, 13.0],
            vec![
                Curve::new("GR", vec![Some(40.0), None, Some(70.0), Some(90.0)]),
                Curve::new("NPHI", vec![Some(0.25), Some(0.3), None, Some(0.1)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn all_curves_required_by_default() {
        assert_eq!(complete_rows(&gappy_table(), &[]).unwrap(), vec![0, 3]);
    }

    #[test]
    fn only_named_curves_are_checked() {
        assert_eq!(complete_rows(&gappy_table(), &["gr"]).unwrap(), vec![0, 2, 3]);
    }

    #[test]
    fn unknown_required_curve_is_an_error() {
        assert!(matches!(
            complete_rows(&gappy_table(), &["RHOB"]),
            Err(CurveError::CurveNotFound(_))
        ));
    }

    #[test]
    fn dropping_rows_keeps_depth_aligned() {
        let table = drop_incomplete_rows(&gappy_table(), &[]).unwrap();
        assert_eq!(table.depth().values(), &[10.0, 13.0]);
        assert_eq!(table.get("NPHI").unwrap().values, vec![Some(0.25), Some(0.1)]);
    }
}
