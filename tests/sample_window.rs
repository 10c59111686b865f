use wandwatch::{SampleWindow, SampleWindowConfig, SampleWindowError};

fn wand_like() -> SampleWindowConfig {
    SampleWindowConfig {
        channel_count: 3,
        capacity_tuples: 200,
        raw_sample_rate_hz: 119.0,
        target_sample_rate_hz: 25.0,
        window_tuples: 100,
    }
}

fn tuples(flat: &[f32]) -> Vec<[f32; 3]> {
    flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
}

#[test]
fn five_hundred_raw_samples_fill_one_window() {
    let mut window = SampleWindow::new(wand_like()).unwrap();
    assert_eq!(window.decimation_factor(), 5);

    let mut accepted_at = Vec::new();
    for i in 0..500 {
        let v = i as f32;
        if window.ingest(&[v, v, v]).unwrap() {
            accepted_at.push(i);
        }
        // Ready exactly once the 100th tuple lands on raw index 499.
        assert_eq!(window.is_ready(), i >= 499, "readiness at raw index {i}");
    }

    let expected: Vec<usize> = (0..100).map(|k| 4 + 5 * k).collect();
    assert_eq!(accepted_at, expected);

    let read = tuples(&window.read_window(100).unwrap());
    let expected: Vec<[f32; 3]> = expected.iter().map(|&i| [i as f32; 3]).collect();
    assert_eq!(read, expected);
}

#[test]
fn accepted_count_is_floor_of_raw_over_factor() {
    for raw_count in [0usize, 1, 4, 5, 6, 99, 100, 101, 1234] {
        let mut window = SampleWindow::new(wand_like()).unwrap();
        let accepted = (0..raw_count)
            .filter(|&i| window.ingest(&[i as f32; 3]).unwrap())
            .count();
        assert_eq!(accepted, raw_count / 5, "after {raw_count} raw samples");
    }
}

#[test]
fn reads_are_idempotent() {
    let mut window = SampleWindow::new(wand_like()).unwrap();
    for i in 0..700 {
        window.ingest(&[i as f32, 0.0, -(i as f32)]).unwrap();
    }
    let first = window.read_window(100).unwrap();
    let second = window.read_window(100).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 300);
}

#[test]
fn window_survives_cursor_wrap() {
    let mut window = SampleWindow::new(wand_like()).unwrap();

    // 2.5 laps of the 200-tuple ring.
    let raw_count = 500 * 5;
    for i in 0..raw_count {
        window.ingest(&[i as f32; 3]).unwrap();
    }
    assert_eq!(window.write_cursor(), (500 % 200) * 3);

    let read = tuples(&window.read_window(100).unwrap());
    let expected: Vec<[f32; 3]> = (400..500).map(|k| [(4 + 5 * k) as f32; 3]).collect();
    assert_eq!(read, expected);

    // A full-capacity read starts exactly one lap back.
    let full = tuples(&window.read_window(200).unwrap());
    assert_eq!(full[0], [(4 + 5 * 300) as f32; 3]);
    assert_eq!(full[199], [(4 + 5 * 499) as f32; 3]);
}

#[test]
fn oversize_window_is_rejected() {
    let mut window = SampleWindow::new(wand_like()).unwrap();
    for i in 0..500 {
        window.ingest(&[i as f32; 3]).unwrap();
    }
    assert_eq!(
        window.read_window(201),
        Err(SampleWindowError::InvalidLength {
            requested: 201,
            capacity: 200
        })
    );
    // The failed read leaves the window usable.
    assert!(window.read_window(200).is_ok());
}

#[test]
fn reset_closes_the_gate_regardless_of_history() {
    let mut window = SampleWindow::new(wand_like()).unwrap();
    assert_eq!(window.read_window(100), Err(SampleWindowError::NotReady));

    for i in 0..2000 {
        window.ingest(&[i as f32; 3]).unwrap();
    }
    assert!(window.is_ready());

    window.reset();
    assert!(!window.is_ready());
    assert_eq!(window.read_window(100), Err(SampleWindowError::NotReady));
    assert_eq!(window.read_window(1), Err(SampleWindowError::NotReady));

    // A fresh epoch needs a full window again.
    for i in 0..499 {
        window.ingest(&[i as f32; 3]).unwrap();
    }
    assert!(!window.is_ready());
    window.ingest(&[499.0; 3]).unwrap();
    assert!(window.is_ready());
}

#[test]
fn independent_streams_do_not_interfere() {
    let mut left = SampleWindow::new(wand_like()).unwrap();
    let mut right = SampleWindow::new(SampleWindowConfig {
        raw_sample_rate_hz: 25.0,
        ..wand_like()
    })
    .unwrap();

    for i in 0..500 {
        left.ingest(&[1.0; 3]).unwrap();
        if i < 100 {
            right.ingest(&[2.0; 3]).unwrap();
        }
    }

    assert!(left.is_ready() && right.is_ready());
    assert!(left.read_window(100).unwrap().iter().all(|&v| v == 1.0));
    assert!(right.read_window(100).unwrap().iter().all(|&v| v == 2.0));
}

#[test]
fn wrong_channel_count_is_invalid_input() {
    let mut window = SampleWindow::new(wand_like()).unwrap();
    for bad in [&[][..], &[1.0][..], &[1.0, 2.0, 3.0, 4.0][..]] {
        assert!(matches!(
            window.ingest(bad),
            Err(SampleWindowError::InvalidInput(_))
        ));
    }
    assert_eq!(window.write_cursor(), 0);
}
