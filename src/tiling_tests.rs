#[cfg(test)]
mod tests {
    use crate::config::Precedence;
    use crate::error::TilingError;
    use crate::region::Region;
    use crate::stack::FusedLayerMap;
    use crate::tiling::{tile, GeometryTiler};
    use geo::{Area, BooleanOps};
    use geo_types::{polygon, LineString, MultiPolygon, Polygon};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]
    }

    fn areas(region: &Region) -> MultiPolygon<f64> {
        match region {
            Region::MultiArea(mp) => mp.clone(),
            other => panic!("expected MultiArea, got {:?}", other),
        }
    }

    #[test]
    fn test_identical_squares_lower_layer_vanishes() {
        let mut fused = FusedLayerMap::new();
        fused.insert("core".to_string(), Region::Area(rect(0.0, 0.0, 10.0, 10.0)));
        fused.insert("clad".to_string(), Region::Area(rect(0.0, 0.0, 10.0, 10.0)));

        let tiles = tile(&fused).unwrap();

        assert!((areas(&tiles["core"]).unsigned_area() - 100.0).abs() < 1e-9);
        assert!(tiles["clad"].is_empty());
        assert!(matches!(tiles["clad"], Region::MultiArea(_)));
    }

    #[test]
    fn test_nested_squares_l_shape() {
        let mut fused = FusedLayerMap::new();
        fused.insert("core".to_string(), Region::Area(rect(0.0, 0.0, 10.0, 10.0)));
        fused.insert("clad".to_string(), Region::Area(rect(0.0, 0.0, 20.0, 20.0)));

        let tiles = tile(&fused).unwrap();
        let core = areas(&tiles["core"]);
        let clad = areas(&tiles["clad"]);

        assert!((core.unsigned_area() - 100.0).abs() < 1e-9);
        assert!((clad.unsigned_area() - 300.0).abs() < 1e-9);
        assert!(core.intersection(&clad).unsigned_area() < 1e-9);
    }

    #[test]
    fn test_output_keeps_stack_order() {
        let mut fused = FusedLayerMap::new();
        fused.insert("a".to_string(), Region::Area(rect(0.0, 0.0, 1.0, 1.0)));
        fused.insert("b".to_string(), Region::Area(rect(5.0, 0.0, 6.0, 1.0)));
        fused.insert("c".to_string(), Region::Empty);

        let tiles = tile(&fused).unwrap();
        let names: Vec<&str> = tiles.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_last_wins_precedence() {
        let mut fused = FusedLayerMap::new();
        fused.insert("clad".to_string(), Region::Area(rect(0.0, 0.0, 20.0, 20.0)));
        fused.insert("core".to_string(), Region::Area(rect(0.0, 0.0, 10.0, 10.0)));

        let tiles = GeometryTiler::new()
            .with_precedence(Precedence::LastWins)
            .tile(&fused)
            .unwrap();

        assert!((tiles["core"].area() - 100.0).abs() < 1e-9);
        assert!((tiles["clad"].area() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_three_layer_stack() {
        // Strips stacked so each lower layer loses the overlap with every higher one
        let mut fused = FusedLayerMap::new();
        fused.insert("metal".to_string(), Region::Area(rect(4.0, 0.0, 6.0, 10.0)));
        fused.insert("core".to_string(), Region::Area(rect(0.0, 4.0, 10.0, 6.0)));
        fused.insert("box".to_string(), Region::Area(rect(0.0, 0.0, 10.0, 10.0)));

        let tiles = tile(&fused).unwrap();

        assert!((tiles["metal"].area() - 20.0).abs() < 1e-9);
        assert!((tiles["core"].area() - 16.0).abs() < 1e-9);
        assert!((tiles["box"].area() - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_curve_stack_is_clipped() {
        let mut fused = FusedLayerMap::new();
        fused.insert(
            "wire_top".to_string(),
            Region::Curve(LineString::from(vec![(0.0, 0.0), (10.0, 0.0)])),
        );
        fused.insert(
            "wire_bottom".to_string(),
            Region::Curve(LineString::from(vec![(0.0, 5.0), (10.0, 5.0)])),
        );

        let tiles = tile(&fused).unwrap();
        assert!(matches!(tiles["wire_top"], Region::MultiCurve(_)));
        assert!((tiles["wire_bottom"].length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_curves_do_not_share_a_stretch() {
        let mut fused = FusedLayerMap::new();
        fused.insert(
            "top".to_string(),
            Region::Curve(LineString::from(vec![(0.0, 0.0), (10.0, 0.0)])),
        );
        fused.insert(
            "bottom".to_string(),
            Region::Curve(LineString::from(vec![(5.0, 0.0), (15.0, 0.0)])),
        );

        let tiles = tile(&fused).unwrap();
        assert!((tiles["top"].length() - 10.0).abs() < 1e-9);
        assert!((tiles["bottom"].length() - 5.0).abs() < 1e-9);

        let rest = tiles["bottom"].bounding_rect().unwrap();
        assert_eq!((rest.min().x, rest.max().x), (10.0, 15.0));
        // Nothing of the top wire runs along what is left of the bottom one
        assert!((tiles["top"].difference(&tiles["bottom"]).length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_kinds_are_rejected() {
        let mut fused = FusedLayerMap::new();
        fused.insert(
            "wire".to_string(),
            Region::Curve(LineString::from(vec![(-5.0, 20.0), (15.0, 20.0)])),
        );
        fused.insert("slab".to_string(), Region::Area(rect(0.0, 0.0, 10.0, 10.0)));

        let err = tile(&fused).unwrap_err();
        match err {
            TilingError::InvalidTopology { layer, .. } => assert_eq!(layer, "wire"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_map() {
        let tiles = tile(&FusedLayerMap::new()).unwrap();
        assert!(tiles.is_empty());
    }
}
