use super::*;

#[test]
fn export_keys_are_unique_and_increasing() {
    let a = ExportKey::issue();
    let b = ExportKey::issue();
    assert!(b > a);
}

#[test]
fn export_keys_are_unique_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| (0..100).map(|_| ExportKey::issue()).collect::<Vec<_>>()))
        .collect();
    let mut all: Vec<ExportKey> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let n = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), n);
}

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(Canvas::new(4, 3).unwrap().pixel_count(), 12);
}

#[test]
fn pixel_buffer_is_transparent_rgba8() {
    let buf = PixelBuffer::new(Canvas::new(3, 2).unwrap());
    assert_eq!(buf.data.len(), 3 * 2 * 4);
    assert_eq!(buf.stride(), 12);
    assert_eq!(buf.pixel(2, 1), [0, 0, 0, 0]);
    assert_eq!(buf.canvas(), Canvas::new(3, 2).unwrap());
}
