use detgrid::lowlevel::{nms_greedy, sort_candidates_desc};
use detgrid::{iou, Detection, Rect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_candidates(rng: &mut StdRng, count: usize) -> Vec<Detection> {
    (0..count)
        .map(|_| {
            let w = rng.random_range(0.0..0.3);
            let h = rng.random_range(0.0..0.3);
            let rect = Rect::from_center(rng.random::<f32>(), rng.random::<f32>(), w, h);
            Detection::new(rng.random_range(0..4), rect, rng.random::<f32>())
        })
        .collect()
}

#[test]
fn overlapping_boxes_of_different_classes_collapse() {
    let rect = Rect::new(0.3, 0.3, 0.2, 0.2);
    let mut cands = vec![Detection::new(5, rect, 0.6), Detection::new(2, rect, 0.9)];
    sort_candidates_desc(&mut cands);
    let kept = nms_greedy(&cands, 0.45, 100);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].label, 2);
    assert!((kept[0].probability - 0.9).abs() < 1e-6);
}

#[test]
fn iou_equal_to_threshold_is_not_suppressed() {
    let a = Detection::new(0, Rect::new(0.0, 0.0, 0.5, 0.5), 0.9);
    let b = Detection::new(1, Rect::new(0.0, 0.0, 0.25, 0.5), 0.8);
    let overlap = iou(&a.rect, &b.rect);
    assert_eq!(overlap, 0.5);
    assert_eq!(nms_greedy(&[a, b], overlap, 10), vec![a, b]);
}

#[test]
fn zero_area_boxes_never_suppress() {
    let point = Detection::new(0, Rect::new(0.4, 0.4, 0.0, 0.0), 0.95);
    let boxed = Detection::new(0, Rect::new(0.3, 0.3, 0.2, 0.2), 0.5);
    let kept = nms_greedy(&[point, boxed], 0.0, 10);
    assert_eq!(kept, vec![point, boxed]);
}

#[test]
fn kept_pairs_respect_threshold_and_order() {
    let mut rng = StdRng::seed_from_u64(2024);
    for &nt in &[0.0f32, 0.3, 0.45, 0.7, 1.0] {
        let mut cands = random_candidates(&mut rng, 300);
        sort_candidates_desc(&mut cands);
        let kept = nms_greedy(&cands, nt, 50);

        assert!(kept.len() <= 50);
        assert!(!kept.is_empty());
        assert_eq!(kept[0], cands[0]);
        for pair in kept.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                assert!(iou(&a.rect, &b.rect) <= nt);
            }
        }
    }
}

#[test]
fn threshold_one_keeps_everything_up_to_capacity() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut cands = random_candidates(&mut rng, 40);
    sort_candidates_desc(&mut cands);
    assert_eq!(nms_greedy(&cands, 1.0, 100), cands);
    assert_eq!(nms_greedy(&cands, 1.0, 10), cands[..10].to_vec());
}
