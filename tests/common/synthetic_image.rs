use ndarray::Array2;

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Array2<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    Array2::from_shape_fn((height, width), |(y, x)| {
        if (x / cell + y / cell) % 2 == 0 {
            32u8
        } else {
            220u8
        }
    })
}

/// Every pixel set to `value`.
#[allow(dead_code)]
pub fn uniform_u8(width: usize, height: usize, value: u8) -> Array2<u8> {
    Array2::from_elem((height, width), value)
}

/// Left half `left`, right half `right`.
#[allow(dead_code)]
pub fn vertical_step_u8(width: usize, height: usize, left: u8, right: u8) -> Array2<u8> {
    Array2::from_shape_fn((height, width), |(_, x)| if x < width / 2 { left } else { right })
}

/// Scratch directory under the system temp dir, emptied on creation.
#[allow(dead_code)]
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("grayconv-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
