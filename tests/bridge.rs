mod common;

use std::sync::Arc;

use pixbridge::bridge::{
    batch_annotated, extract_annotated, from_visualization, take_annotated, to_visualization,
    Extraction,
};
use pixbridge::driver::gather_handles;
use pixbridge::engine::{image_from_bytes, ForeignImage, InferResult, ResultMeta};
use pixbridge::fsutil::list_image_paths;
use pixbridge::visual::VisImage;

fn patterned(width: u32, height: u32, components: u32) -> VisImage {
    #[allow(clippy::cast_possible_truncation)]
    let scalars = (0..width * height * components).map(|i| (i * 7) as u8).collect();
    VisImage::from_scalars(width, height, components, scalars).unwrap()
}

#[test]
fn double_conversion_cancels_out() {
    for (w, h, c) in [(3, 4, 3), (5, 3, 1), (2, 7, 4), (1, 1, 3)] {
        let source = patterned(w, h, c);
        let first = from_visualization(Some(&source)).unwrap();
        let vis = to_visualization(&first).unwrap();
        assert_eq!(*vis, source);

        let second = from_visualization(Some(&*vis)).unwrap();
        assert_eq!(second.to_bytes(), first.to_bytes());
        assert_eq!(second.info(), first.info());
    }
}

#[test]
fn empty_values_stay_empty() {
    assert!(to_visualization(&ForeignImage::empty()).is_none());
    assert!(to_visualization(&image_from_bytes(&[], 0, 0, 0).unwrap()).is_none());
    assert!(from_visualization(None).unwrap().is_empty());
}

#[test]
fn taking_read_happens_once() {
    let handle = image_from_bytes(&[1, 2, 3, 4, 5, 6], 2, 1, 3).unwrap();
    let mut result = InferResult::new(Some(handle.into_dynamic()), ResultMeta::default());

    let first = extract_annotated(&mut result, Extraction::Take);
    assert_eq!(first.to_bytes(), vec![1, 2, 3, 4, 5, 6]);

    let second = extract_annotated(&mut result, Extraction::Take);
    assert!(second.is_empty());
    assert!(take_annotated(&mut result).is_none());
    assert!(batch_annotated(std::slice::from_ref(&result))[0].is_none());
}

#[test]
fn cloning_read_can_repeat() {
    let mut result = InferResult::new(
        Some(image::DynamicImage::new_luma8(2, 2)),
        ResultMeta::default(),
    );
    for _ in 0..3 {
        let vis = batch_annotated(std::slice::from_ref(&result))
            .pop()
            .flatten()
            .expect("annotated image still stored");
        assert_eq!(vis.scalar_components(), 1);
    }
    assert!(!extract_annotated(&mut result, Extraction::from_take(false)).is_empty());
    assert!(result.has_annotated());
}

#[test]
fn two_channel_images_are_skipped() {
    let project = common::project();
    let mut paths = list_image_paths(&project.path().join("assets/images/small-batch")).unwrap();
    paths.sort();

    let (handles, skipped) = gather_handles(&paths);
    // boats.png (RGBA) and bus.JPG (RGB) pass, mask.png (gray+alpha) does not.
    assert_eq!(paths.len(), 3);
    assert_eq!(skipped, 1);
    let channels: Vec<u32> = handles.iter().map(|h| h.info().channels).collect();
    assert_eq!(channels, vec![4, 3]);
}

#[test]
fn two_component_visualization_is_rejected() {
    let vis = Arc::new(VisImage::allocate(2, 2, 2));
    assert!(from_visualization(Some(&*vis)).is_err());
}
