use rand::{rngs::StdRng, Rng, SeedableRng};

use pixconv_image::Rgb8Image;
use pixconv_imgproc::filter::{
    apply_filter, convolve, edge_detection, gaussian_blur, kernels, sharpen, BorderMode,
    FilterConfig, FilterError, FilterKind,
};

fn random_image(width: usize, height: usize, seed: u64) -> Result<Rgb8Image, FilterError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height * 3).map(|_| rng.random::<u8>()).collect();
    Ok(Rgb8Image::new([width, height].into(), data)?)
}

#[test]
fn gaussian_kernels_are_normalized() -> Result<(), FilterError> {
    for kernel_size in (3..=15).step_by(2) {
        let kernel = kernels::gaussian_kernel_2d(kernel_size)?;
        approx::assert_abs_diff_eq!(kernel.sum(), 1.0, epsilon = 1e-4);
    }
    Ok(())
}

#[test]
fn results_do_not_depend_on_thread_count() -> Result<(), FilterError> {
    let src = random_image(37, 23, 42)?;

    for kind in FilterKind::ALL {
        let reference = apply_filter(&src, &FilterConfig::new(kind, 7, 1))?;
        for num_threads in [0, 2, 3, 4, 8, 16] {
            let dst = apply_filter(&src, &FilterConfig::new(kind, 7, num_threads))?;
            assert_eq!(dst, reference, "{kind} with {num_threads} threads");
        }
    }

    let kernel = kernels::gaussian_kernel_2d(9)?;
    let post = |acc: [f32; 3]| acc.map(|v| v.clamp(0.0, 255.0) as u8);
    let reference = convolve(&src, &kernel, BorderMode::Replicate, 1, post)?;
    for num_threads in [2, 5, 7] {
        let dst = convolve(&src, &kernel, BorderMode::Replicate, num_threads, post)?;
        assert_eq!(dst, reference);
    }
    Ok(())
}

#[test]
fn uniform_images_are_preserved() -> Result<(), FilterError> {
    let pixel = [173, 41, 222];
    let src = Rgb8Image::from_size_pixel([16, 12].into(), pixel)?;

    for kernel_size in [3, 5, 9, 15] {
        assert_eq!(gaussian_blur(&src, kernel_size, 4)?, src);
    }

    let sharpened = sharpen(&src, 4)?;
    let edges = edge_detection(&src, 4)?;
    for y in 1..11 {
        for x in 1..15 {
            assert_eq!(sharpened.pixel(x, y)?, &pixel);
            assert_eq!(edges.pixel(x, y)?, &[0, 0, 0]);
        }
    }
    Ok(())
}

#[test]
fn gaussian_blur_replicates_edges() -> Result<(), FilterError> {
    // 3x3 image, every channel holds 20 * (3y + x) + 5:
    //
    //    5  25  45
    //   65  85 105
    //  125 145 165
    let src = Rgb8Image::from_fn([3, 3].into(), |x, y| [(20 * (3 * y + x) + 5) as u8; 3])?;
    let dst = gaussian_blur(&src, 3, 2)?;

    // sigma = 0.5, so relative weights are 1 (center), exp(-2) (edge), exp(-4) (corner)
    let norm = 1.0 + 4.0 * (-2f64).exp() + 4.0 * (-4f64).exp();
    let (center, edge, corner) = (1.0 / norm, (-2f64).exp() / norm, (-4f64).exp() / norm);

    // at (0, 0) the samples left of and above the image replicate the first row/column:
    //
    //   5  5 25
    //   5  5 25
    //  65 65 85
    let expected = center * 5.0
        + edge * (5.0 + 5.0 + 25.0 + 65.0)
        + corner * (5.0 + 25.0 + 65.0 + 85.0);
    assert_eq!(expected.floor(), 13.0);
    assert_eq!(dst.pixel(0, 0)?, &[13, 13, 13]);

    // at (2, 2) the samples right of and below the image replicate the last row/column
    let expected = center * 165.0
        + edge * (105.0 + 145.0 + 165.0 + 165.0)
        + corner * (85.0 + 105.0 + 145.0 + 165.0);
    assert_eq!(expected.floor(), 156.0);
    assert_eq!(dst.pixel(2, 2)?, &[156, 156, 156]);

    // the center is a weighted average of a linear ramp
    assert_eq!(dst.pixel(1, 1)?, &[85, 85, 85]);
    Ok(())
}

#[test]
fn even_kernel_sizes_are_rounded_up() -> Result<(), FilterError> {
    let src = random_image(12, 10, 7)?;

    let config = FilterConfig::new(FilterKind::GaussianBlur, 6, 2);
    assert_eq!(config.kernel_size(), 7);
    assert_eq!(apply_filter(&src, &config)?, gaussian_blur(&src, 7, 1)?);

    // the kernel builder itself never accepts an even size
    assert_eq!(
        kernels::gaussian_kernel_2d(6),
        Err(FilterError::InvalidKernelSize(6))
    );
    Ok(())
}

#[test]
fn border_ring_is_black_for_fixed_masks() -> Result<(), FilterError> {
    let src = random_image(9, 8, 3)?;
    for dst in [sharpen(&src, 2)?, edge_detection(&src, 2)?] {
        for x in 0..9 {
            assert_eq!(dst.pixel(x, 0)?, &[0, 0, 0]);
            assert_eq!(dst.pixel(x, 7)?, &[0, 0, 0]);
        }
        for y in 0..8 {
            assert_eq!(dst.pixel(0, y)?, &[0, 0, 0]);
            assert_eq!(dst.pixel(8, y)?, &[0, 0, 0]);
        }
    }
    Ok(())
}

#[test]
fn edge_detection_is_gray() -> Result<(), FilterError> {
    let src = random_image(10, 10, 11)?;
    let dst = edge_detection(&src, 3)?;
    for pixel in dst.as_slice().chunks_exact(3) {
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
    }
    Ok(())
}
