use thiserror::Error;

use crate::assemble::assemble_schematic;
use crate::config::{ConfigError, ExportConfig};
use crate::encode::{build_program, TileProgram};
use crate::extract::{ExtractError, RectExtractor};
use crate::grid::GridPlan;
use crate::pixmap::Pixmap;
use crate::schematic::{link_name, Schematic};

/// Errors aborting an export run. Extractor failures pass through unchanged;
/// there are no retries and no partial results.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Run the full export pipeline: plan the grid, scale the source to cover it,
/// encode one program per active tile, and assemble the schematic.
///
/// Strictly sequential; tiles are processed in row-major order and cells past
/// `requested_count` are never cropped or encoded.
pub fn export<E: RectExtractor>(
    config: &ExportConfig,
    source: &Pixmap,
    extractor: &E,
) -> Result<Schematic, ExportError> {
    config.validate()?;

    let plan = GridPlan::for_count(config.requested_count as i64);
    let unit = config.unit_display_size;
    let total_w = plan.columns * unit;
    let total_h = plan.rows * unit;

    let scaled;
    let source = if source.width() != total_w || source.height() != total_h {
        log::info!(
            "scaling source to grid size {}x{} ({}x{} displays)",
            total_w,
            total_h,
            plan.columns,
            plan.rows
        );
        scaled = source.scale(total_w, total_h);
        &scaled
    } else {
        source
    };

    let limits = config.limits();
    let mut programs: Vec<TileProgram> = Vec::with_capacity(config.requested_count as usize);
    for cell in plan.cells() {
        if cell.index >= config.requested_count {
            continue;
        }
        log::info!(
            "processing tile {} of {} ({}, {})",
            cell.index + 1,
            config.requested_count,
            cell.column + 1,
            cell.row + 1
        );
        let tile = source.crop(cell.column * unit, cell.row * unit, unit, unit);
        let colors = extractor.extract(config, &tile)?;
        programs.push(build_program(&colors, &limits, &link_name(cell.index), unit));
    }

    log::info!("building schematic");
    Ok(assemble_schematic(&plan, config.requested_count, unit, &programs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::extract::{ColorRectangles, RowRunExtractor};

    fn solid(width: u32, height: u32, color: Rgba) -> Pixmap {
        let mut p = Pixmap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                p.set(x, y, color);
            }
        }
        p
    }

    #[test]
    fn test_single_tile_end_to_end() {
        let config = ExportConfig {
            unit_display_size: 16,
            requested_count: 1,
            ..Default::default()
        };
        let source = solid(16, 16, Rgba::opaque(255, 0, 0));
        let schem = export(&config, &source, &RowRunExtractor::new()).unwrap();

        assert_eq!(schem.pair_count(), 1);
        assert_eq!(schem.name, "1x1 display grid");
        let code = &schem.pairs[0].processor.code;
        assert!(code.contains("draw color 255 0 0 255"));
        assert!(code.contains("draw rect 0 0 16 16"));
        assert!(code.ends_with("drawflush display1"));
    }

    #[test]
    fn test_flush_targets_match_declared_links() {
        let config = ExportConfig {
            unit_display_size: 8,
            requested_count: 5,
            ..Default::default()
        };
        // 2x3 grid for 5 displays; the source gets scaled to 16x24.
        let source = solid(10, 10, Rgba::opaque(0, 128, 255));
        let schem = export(&config, &source, &RowRunExtractor::new()).unwrap();

        assert_eq!(schem.pair_count(), 5);
        for pair in &schem.pairs {
            let link = &pair.processor.links[0].name;
            assert!(
                pair.processor.code.ends_with(&format!("drawflush {}", link)),
                "program flush target must match link {}",
                link
            );
        }
    }

    #[test]
    fn test_transparent_source_yields_empty_programs() {
        let config = ExportConfig {
            unit_display_size: 8,
            requested_count: 2,
            ..Default::default()
        };
        let source = Pixmap::new(16, 8);
        let schem = export(&config, &source, &RowRunExtractor::new()).unwrap();
        assert_eq!(schem.pair_count(), 2);
        for pair in &schem.pairs {
            assert!(pair.processor.code.is_empty());
        }
    }

    #[test]
    fn test_invalid_config_is_rejected_at_boundary() {
        let config = ExportConfig {
            instruction_budget: 0,
            ..Default::default()
        };
        let source = solid(4, 4, Rgba::opaque(1, 2, 3));
        let err = export(&config, &source, &RowRunExtractor::new()).unwrap_err();
        assert!(matches!(err, ExportError::Config(_)));
    }

    #[test]
    fn test_extractor_failure_aborts_export() {
        struct Failing;
        impl RectExtractor for Failing {
            fn extract(
                &self,
                _config: &ExportConfig,
                _tile: &Pixmap,
            ) -> Result<ColorRectangles, ExtractError> {
                Err(ExtractError::Failed("unreadable bitmap".into()))
            }
        }

        let config = ExportConfig {
            unit_display_size: 4,
            ..Default::default()
        };
        let source = solid(4, 4, Rgba::opaque(1, 2, 3));
        let err = export(&config, &source, &Failing).unwrap_err();
        assert!(matches!(err, ExportError::Extract(ExtractError::Failed(_))));
    }
}
