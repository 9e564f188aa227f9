use approx::{assert_abs_diff_eq, assert_relative_eq};
use sofa_core::cushions::{self, CATALOG};
use sofa_core::topology::{CornerStyle, Run, resolve_shape};
use sofa_core::trim::ARMREST_WIDTH;
use sofa_core::{
    CushionPolicy, CushionSize, Error, LayoutError, Lengths, OneCornerVariant, PartKind,
    RenderError, RenderOptions, ShapeKind, Side, SideFlags, SofaConfiguration, SofaSpec,
    build_scene, plan, render_configuration, svg_configuration,
};

fn sum(widths: impl IntoIterator<Item = f64>) -> f64 {
    widths.into_iter().sum()
}

#[test]
fn straight_sofa_between_two_armrests() {
    let config = SofaConfiguration::new(ShapeKind::Simple, Lengths::straight(280.0), 70.0).unwrap();
    let layout = plan(&config).unwrap();
    let seg = layout.segment(Run::Bottom).unwrap();
    assert_relative_eq!(seg.usable, 280.0 - 2.0 * ARMREST_WIDTH);
    assert_abs_diff_eq!(sum(seg.cushions.iter().map(|m| m.width)), seg.usable, epsilon = 1e-6);
    let catalog: Vec<f64> = CATALOG.iter().map(|s| s.nominal()).collect();
    assert!(seg.cushions.iter().all(|m| catalog.contains(&m.width)));
}

#[test]
fn l_corner_with_left_meridienne() {
    let config = SofaConfiguration::new(ShapeKind::LCorner, Lengths::l(350.0, 250.0), 70.0)
        .unwrap()
        .with_meridienne(Side::Left, 100.0)
        .unwrap();
    let layout = plan(&config).unwrap();
    let left = layout.segment(Run::Left).unwrap();
    let block = left.meridienne.unwrap();
    assert_relative_eq!(block.length, 100.0);
    assert_relative_eq!(left.usable, 250.0 - 70.0 - ARMREST_WIDTH - 100.0);
    assert!(layout.segment(Run::Bottom).unwrap().meridienne.is_none());
    assert_eq!(layout.joints.len(), 1);
    assert_eq!(layout.joints[0].style, CornerStyle::Mitred);
    assert_eq!(layout.joints[0].pieces.len(), 2);

    let scene = build_scene(&config).unwrap();
    assert_eq!(scene.parts_of(PartKind::Meridienne).count(), 1);
}

#[test]
fn u_one_corner_v2_mitres_only_the_left_corner() {
    let topo = resolve_shape(
        ShapeKind::UOneCorner(OneCornerVariant::V2),
        &Lengths::u(350.0, 300.0, 280.0),
        70.0,
    )
    .unwrap();
    let styles: Vec<_> = topo.corners.iter().map(|c| (c.at, c.style)).collect();
    assert_eq!(
        styles,
        vec![(Run::Left, CornerStyle::Mitred), (Run::Right, CornerStyle::Square)]
    );
}

#[test]
fn fixed_65_over_140_gives_two_70s() {
    let widths = cushions::tile(140.0, CushionPolicy::Fixed(CushionSize::W65)).unwrap();
    assert_eq!(widths.len(), 2);
    for w in widths {
        assert_abs_diff_eq!(w, 70.0, epsilon = 1e-9);
    }
}

#[test]
fn tiling_sums_to_usable_length() {
    for policy in ["auto", "65", "80", "90", "valise", "p", "g"] {
        let policy: CushionPolicy = policy.parse().unwrap();
        for step in 0..200 {
            let usable = policy.minimum() + step as f64 * 2.35;
            let widths = cushions::tile(usable, policy).unwrap();
            assert!(widths.iter().all(|w| *w >= 0.0));
            assert_abs_diff_eq!(sum(widths), usable, epsilon = 1.0);
        }
    }
}

#[test]
fn every_shape_resolves_consistently() {
    for shape in ShapeKind::ALL {
        let lengths = match (shape.has_left_return(), shape.has_right_return()) {
            (true, true) => Lengths::u(400.0, 300.0, 260.0),
            (true, false) => Lengths::l(400.0, 300.0),
            _ => Lengths::straight(400.0),
        };
        let topo = resolve_shape(shape, &lengths, 80.0).unwrap();
        let expected = match shape {
            ShapeKind::Simple => (1, 0),
            ShapeKind::LNoCorner | ShapeKind::LCorner => (2, 1),
            _ => (3, 2),
        };
        assert_eq!((topo.segments.len(), topo.corners.len()), expected, "{shape}");
        for seg in &topo.segments {
            assert_eq!(lengths.get(seg.length_name), Some(seg.length));
        }

        let config = SofaConfiguration::new(shape, lengths, 80.0).unwrap();
        let layout = plan(&config).unwrap();
        for seg in &layout.segments {
            assert!(seg.usable >= 0.0, "{shape} {}", seg.run);
        }
    }
}

#[test]
fn crowded_u_is_infeasible_not_negative() {
    let config =
        SofaConfiguration::new(ShapeKind::UTwoCorner, Lengths::u(100.0, 250.0, 250.0), 70.0)
            .unwrap();
    let err = plan(&config).unwrap_err();
    assert!(matches!(err, Error::Layout(_)), "{err}");

    let config = SofaConfiguration::new(ShapeKind::Simple, Lengths::straight(25.0), 70.0).unwrap();
    match plan(&config) {
        Err(Error::Layout(e)) => {
            assert!(matches!(e.root(), LayoutError::NegativeUsable { .. }))
        }
        other => panic!("expected a layout error, got {other:?}"),
    }
}

#[test]
fn meridienne_sub_run_has_no_cushion_or_backrest() {
    let shapes = [
        (ShapeKind::Simple, Lengths::straight(300.0), Side::Right),
        (ShapeKind::Simple, Lengths::straight(300.0), Side::Left),
        (ShapeKind::LNoCorner, Lengths::l(350.0, 260.0), Side::Bottom),
        (ShapeKind::UNoCorner, Lengths::u(380.0, 300.0, 300.0), Side::Right),
    ];
    for (shape, lengths, side) in shapes {
        let config = SofaConfiguration::new(shape, lengths, 70.0)
            .unwrap()
            .with_meridienne(side, 90.0)
            .unwrap();
        let layout = plan(&config).unwrap();
        let seg = layout
            .segments
            .iter()
            .find(|s| s.meridienne.is_some())
            .unwrap();
        let (a, b) = seg.meridienne.unwrap().span();
        let overlaps = |s0: f64, s1: f64| s0 < b - 1e-9 && s1 > a + 1e-9;
        for m in &seg.cushions {
            assert!(!overlaps(m.offset, m.offset + m.width), "{shape}: cushion {m:?}");
        }
        for &(s0, s1) in &seg.backrest_spans {
            assert!(!overlaps(s0, s1), "{shape}: backrest {s0}..{s1}");
        }
    }
}

#[test]
fn missing_backrests_and_armrests_widen_the_seat() {
    let config = SofaConfiguration::new(ShapeKind::Simple, Lengths::straight(240.0), 70.0)
        .unwrap()
        .with_armrests(SideFlags::none())
        .with_backrests(SideFlags::none());
    let layout = plan(&config).unwrap();
    let seg = layout.segment(Run::Bottom).unwrap();
    assert_relative_eq!(seg.usable, 240.0);
    assert_relative_eq!(seg.seat_offset, 0.0);
    assert!(seg.backrest_spans.is_empty());
    let scene = build_scene(&config).unwrap();
    assert_eq!(scene.parts_of(PartKind::Armrest).count(), 0);
    assert_eq!(scene.parts_of(PartKind::Backrest).count(), 0);
}

#[test]
fn json_configuration_builds_the_same_scene() {
    let spec: SofaSpec = serde_json::from_str(
        r##"{
            "shape": "u1f-v4",
            "tx": 360, "ty": 280, "tz": 300,
            "depth": 80,
            "cushions": "80",
            "palette": {"cushion": "#ddeeff"}
        }"##,
    )
    .unwrap();
    let from_json = SofaConfiguration::try_from(spec).unwrap();
    let scene = build_scene(&from_json).unwrap();
    assert!(scene.parts_of(PartKind::Cushion).all(|p| p.fill == "#ddeeff"));
    assert_eq!(scene, build_scene(&from_json).unwrap());
}

#[test]
fn rendering_twice_is_identical() {
    let config =
        SofaConfiguration::new(ShapeKind::UTwoCorner, Lengths::u(350.0, 300.0, 280.0), 70.0)
            .unwrap()
            .with_meridienne(Side::Left, 80.0)
            .unwrap();
    let options = RenderOptions {
        px_per_cm: 1.0,
        ..RenderOptions::default()
    };
    let first = render_configuration(&config, &options).unwrap();
    let second = render_configuration(&config, &options).unwrap();
    assert_eq!(first.svg, second.svg);
    assert_eq!(first.png, second.png);
    assert!(first.width > 350 && first.height > 300);
}

#[test]
fn svg_output_checks_the_scale() {
    let config = SofaConfiguration::new(ShapeKind::Simple, Lengths::straight(280.0), 70.0).unwrap();
    for px_per_cm in [0.0, -2.0, f64::NAN] {
        let options = RenderOptions {
            px_per_cm,
            ..RenderOptions::default()
        };
        let err = svg_configuration(&config, &options).unwrap_err();
        assert!(matches!(err, Error::Render(RenderError::InvalidScale(_))), "{err}");
    }
    let (svg, width, height) = svg_configuration(&config, &RenderOptions::default()).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(width > 0 && height > 0);
}
