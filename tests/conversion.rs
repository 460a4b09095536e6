use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};

use approx::assert_abs_diff_eq;
use nestframe::{
    Coordinate, Frame, FrameError, FrameTree, Kind, Limits, Vector2D, convert_all,
    convert_all_with, tf,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_close(c: &Coordinate, x: f64, y: f64) {
    assert_abs_diff_eq!(c.x(), x, epsilon = 1e-9);
    assert_abs_diff_eq!(c.y(), y, epsilon = 1e-9);
}

#[test]
fn converting_into_own_frame_is_identity() {
    init();
    let frame = Frame::from_trks(None, 4.0, -2.0, 0.7, 0.2, -0.1, 1.5, 0.5);
    for c in [
        Coordinate::point(3.0, -1.25, frame.clone()),
        Coordinate::vector(-2.0, 8.0, frame.clone()),
    ] {
        let same = c.to_frame(&frame).unwrap();
        assert_close(&same, c.x(), c.y());
        assert_eq!(same.kind(), c.kind());
        assert_eq!(same.frame(), &frame);
    }
}

#[test]
fn there_and_back_recovers_local_values() {
    init();
    let root = Frame::from_trs(None, 1.0, 2.0, FRAC_PI_3, 2.0, 0.5);
    let a = Frame::from_trs(Some(&root), -3.0, 0.5, 0.4, 1.0, 3.0);
    let b = Frame::from_trks(Some(&root), 7.0, 1.0, -1.1, 0.3, 0.0, 0.25, 4.0);
    for c in [
        Coordinate::point(1.5, -2.5, a.clone()),
        Coordinate::vector(1.5, -2.5, a.clone()),
    ] {
        let back = c.to_frame(&b).unwrap().to_frame(&a).unwrap();
        assert_close(&back, 1.5, -2.5);
        assert_eq!(back.kind(), c.kind());
    }
}

#[test]
fn translation_moves_points_but_not_vectors() {
    init();
    let frame = Frame::root(tf::translate(5.0, 3.0));
    let point = Coordinate::point(0.0, 0.0, frame.clone()).to_global().unwrap();
    let vector = Coordinate::vector(0.0, 0.0, frame).to_global().unwrap();
    assert_eq!(point.local(), Vector2D::new(5.0, 3.0));
    assert_eq!(vector.local(), Vector2D::new(0.0, 0.0));
    assert!(point.is_point());
    assert!(vector.is_vector());
}

#[test]
fn nested_translations_accumulate() {
    init();
    let root = Frame::root(tf::translate(10.0, 5.0));
    let child = root.child(tf::translate(3.0, 2.0));
    let global = Coordinate::point(0.0, 0.0, child.clone()).to_global().unwrap();
    assert_eq!(global.local(), Vector2D::new(13.0, 7.0));

    let offset = Coordinate::point(1.0, 1.0, child).to_global().unwrap();
    assert_eq!(offset.local(), Vector2D::new(14.0, 8.0));
}

#[test]
fn independent_roots_share_the_world() {
    init();
    let a = Frame::root(tf::translate(5.0, 0.0));
    let b = Frame::root(tf::translate(0.0, 3.0));
    let in_b = Coordinate::point(0.0, 0.0, a.clone()).to_frame(&b).unwrap();
    assert_close(&in_b, 5.0, -3.0);
    assert_eq!(in_b.frame(), &b);

    // Same answer with both frames hung under an identity root.
    let world = Frame::default();
    let a = world.child(tf::translate(5.0, 0.0));
    let b = world.child(tf::translate(0.0, 3.0));
    assert_close(
        &Coordinate::point(0.0, 0.0, a).to_frame(&b).unwrap(),
        5.0,
        -3.0,
    );
}

#[test]
fn quarter_turn_rotates_x_onto_y() {
    init();
    let frame = Frame::root(tf::rotate(FRAC_PI_2));
    let p = Coordinate::point(1.0, 0.0, frame).to_global().unwrap();
    assert_close(&p, 0.0, 1.0);
}

#[test]
fn trs_frame_scales_rotates_then_translates() {
    init();
    let frame = Frame::from_trs(None, 5.0, 3.0, FRAC_PI_2, 2.0, 2.0);
    let p = Coordinate::point(1.0, 0.0, frame.clone()).to_global().unwrap();
    assert_close(&p, 3.0, 4.0);

    let direct = tf::translate(5.0, 3.0) * tf::rotate(FRAC_PI_2) * tf::scale(2.0, 2.0);
    let q = nestframe::apply_transform(&direct, Vector2D::new(1.0, 0.0), Kind::Point);
    assert_abs_diff_eq!(q.x, p.x(), epsilon = 1e-12);
    assert_abs_diff_eq!(q.y, p.y(), epsilon = 1e-12);

    // Vectors skip the translation.
    let v = Coordinate::vector(1.0, 0.0, frame).to_global().unwrap();
    assert_close(&v, 0.0, 2.0);
}

#[test]
fn collapsed_target_is_an_error_not_nan() {
    init();
    let collapsed = Frame::root(tf::scale(0.0, 0.0));
    let source = Frame::root(tf::translate(1.0, 2.0));

    let err = source.compute_convert_transform(&collapsed).unwrap_err();
    assert!(matches!(err, FrameError::SingularTransform { .. }));

    let err = Coordinate::point(1.0, 1.0, source)
        .to_frame(&collapsed)
        .unwrap_err();
    assert!(err.is_singular());

    // A collapsed parent makes every descendant collapsed too.
    let child = collapsed.child(tf::translate(1.0, 1.0));
    assert!(Coordinate::vector(1.0, 0.0, None).to_frame(&child).is_err());
}

#[test]
fn conversion_never_mutates_source() {
    init();
    let a = Frame::root(tf::trs(1.0, 1.0, 0.5, 2.0, 2.0));
    let b = Frame::root(tf::translate(-4.0, 0.0));
    let p = Coordinate::point(2.0, 3.0, a.clone());
    let before = p.clone();
    let _ = p.to_frame(&b).unwrap();
    let _ = p.to_global().unwrap();
    assert_eq!(p, before);
    assert_eq!(p.frame(), &a);
}

#[test]
fn frame_tree_matches_handles() {
    init();
    let mut tree = FrameTree::new();
    let base = tree
        .insert_named("base", None, tf::translate(10.0, 5.0))
        .unwrap();
    let arm = tree
        .insert_named("arm", Some(base), tf::trs(0.0, 1.0, FRAC_PI_2, 1.0, 1.0))
        .unwrap();
    let tool = tree.insert(Some(arm), tf::translate(2.0, 0.0)).unwrap();

    let tool_frame = tree.frame(tool).unwrap();
    let tip = Coordinate::point(0.0, 0.0, tool_frame.clone());
    let global = tip.to_global().unwrap();
    assert_close(&global, 10.0, 8.0);

    let globals = tree.globals().unwrap();
    let via_tree = nestframe::apply_transform(&globals[&tool], tip.local(), Kind::Point);
    assert_abs_diff_eq!(via_tree.x, 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(via_tree.y, 8.0, epsilon = 1e-9);

    let base_frame = tree.frame(tree.id_of("base").unwrap()).unwrap();
    let in_base = tip.to_frame(base_frame).unwrap();
    assert_close(&in_base, 0.0, 3.0);
}

#[test]
fn tree_limits_carry_into_coordinates() {
    init();
    let mut tree = FrameTree::with_limits(Limits::default().with_max_depth(4096));
    let mut id = tree.insert(None, tf::translate(1.0, 0.0)).unwrap();
    for _ in 1..1500 {
        id = tree.insert(Some(id), tf::translate(1.0, 0.0)).unwrap();
    }
    let leaf = tree.frame(id).unwrap().clone();
    let p = Coordinate::point(0.0, 0.0, leaf.clone());

    assert_eq!(p.to_global(), Err(FrameError::CyclicFrame { limit: 1024 }));
    assert_close(&p.to_global_with(tree.limits()).unwrap(), 1500.0, 0.0);

    let world = Frame::root(tf::translate(0.0, 2.0));
    assert!(p.to_frame(&world).is_err());
    assert_close(&p.to_frame_with(&world, tree.limits()).unwrap(), 1500.0, -2.0);

    let batch = [p.clone(), Coordinate::vector(1.0, 0.0, leaf)];
    assert!(convert_all(&batch, &world).is_err());
    let out = convert_all_with(&batch, &world, tree.limits()).unwrap();
    assert_close(&out[0], 1500.0, -2.0);
    assert_close(&out[1], 1.0, 0.0);
}

#[test]
fn singular_epsilon_is_taken_from_limits() {
    init();
    // Axes (1, 0) and (3, 1): |det| / (|x| * |y|) is about 0.32.
    let skewed = Frame::root(tf::shear(3.0, 0.0));
    let p = Coordinate::point(4.0, 1.0, None);
    assert_close(&p.to_frame(&skewed).unwrap(), 1.0, 1.0);

    let strict = Limits::default().with_singular_epsilon(0.5);
    assert!(p.to_frame_with(&skewed, &strict).unwrap_err().is_singular());
    assert!(convert_all_with(&[p], &skewed, &strict).is_err());
}

#[test]
fn tiny_uniform_scale_is_not_singular() {
    init();
    let tiny = Frame::root(tf::scale(1e-7, 1e-7));
    let p = Coordinate::point(1.0, 2.0, None).to_frame(&tiny).unwrap();
    assert_abs_diff_eq!(p.x(), 1e7, epsilon = 1e-3);
    assert_abs_diff_eq!(p.y(), 2e7, epsilon = 1e-3);
    let back = p.to_global().unwrap();
    assert_close(&back, 1.0, 2.0);

    let huge = Frame::root(tf::scale(1e7, 1e7));
    let v = Coordinate::vector(3.0, 0.0, None).to_frame(&huge).unwrap();
    assert_abs_diff_eq!(v.x(), 3e-7, epsilon = 1e-15);
}
