//! Integration tests for pixfmt crates.
//!
//! These tests exercise the crates together: color models over real
//! rasters, images over shared storage, and the process-wide tables under
//! concurrent use.

#[cfg(test)]
mod roundtrip {
    use pixfmt_color::{ColorModel, ComponentColorModel, DirectColorModel};
    use pixfmt_core::{colorspace, ColorSpaceRef, DataType, Transparency};

    fn sample_colors() -> Vec<u32> {
        let mut out = Vec::new();
        for a in [0u32, 1, 128, 254, 255] {
            for r in (0..=255u32).step_by(17) {
                for g in (0..=255u32).step_by(51) {
                    for b in [0u32, 7, 128, 255] {
                        out.push(a << 24 | r << 16 | g << 8 | b);
                    }
                }
            }
        }
        out
    }

    /// Largest error an 8-bit channel may pick up through `bits` of storage.
    fn bound(bits: u32) -> i32 {
        if bits >= 8 {
            0
        } else {
            (255.0 / ((1u32 << bits) - 1) as f64).ceil() as i32
        }
    }

    /// Round-trips every sample color through `cm`. Color channels may
    /// drift by the storage quantization or by `slack`, whichever is larger.
    fn check(cm: &ColorModel, slack: i32) {
        let sizes = cm.component_sizes().to_vec();
        for c in sample_colors() {
            let data = cm.data_elements(c, None).unwrap();
            let back = cm.rgb_data(&data).unwrap();
            for (i, shift) in [16, 8, 0].into_iter().enumerate() {
                let want = (c >> shift & 0xff) as i32;
                let got = (back >> shift & 0xff) as i32;
                assert!(
                    (want - got).abs() <= bound(sizes[i]).max(slack),
                    "{} {c:#010x} -> {back:#010x}",
                    cm.kind()
                );
            }
            if cm.has_alpha() {
                let (want, got) = ((c >> 24) as i32, (back >> 24) as i32);
                assert!((want - got).abs() <= bound(sizes[3]), "{c:#010x} -> {back:#010x}");
            } else {
                assert_eq!(back >> 24, 0xff);
            }
        }
    }

    fn component(cs: ColorSpaceRef, bits: Option<&[u32]>, alpha: bool, dt: DataType) -> ColorModel {
        let t = if alpha { Transparency::Translucent } else { Transparency::Opaque };
        ComponentColorModel::new(cs, bits, alpha, false, t, dt).unwrap().into()
    }

    #[test]
    fn test_srgb_component_models() {
        let srgb = colorspace::srgb;
        check(&component(srgb(), None, false, DataType::Byte), 0);
        check(&component(srgb(), None, true, DataType::Byte), 0);
        check(&component(srgb(), None, true, DataType::UShort), 0);
        check(&component(srgb(), None, true, DataType::Short), 0);
        check(&component(srgb(), None, true, DataType::Float), 0);
        check(&component(srgb(), None, false, DataType::Double), 0);
        check(&component(srgb(), Some(&[4, 4, 4][..]), false, DataType::Byte), 0);
        check(&component(srgb(), Some(&[5, 6, 5, 3][..]), true, DataType::UShort), 0);
    }

    #[test]
    fn test_linear_rgb_component_models() {
        // 8-bit linear storage cannot separate the darkest sRGB levels
        check(&component(colorspace::linear_rgb(), None, true, DataType::Byte), 6);
        check(&component(colorspace::linear_rgb(), None, false, DataType::UShort), 0);
    }

    #[test]
    fn test_xyz_component_model() {
        let cm = component(colorspace::cie_xyz(), None, false, DataType::UShort);
        assert!(cm.as_component().is_some_and(|m| !m.supports_unnormalized()));
        check(&cm, 1);
    }

    #[test]
    fn test_direct_models() {
        check(&ColorModel::rgb_default(), 0);
        check(&DirectColorModel::new(24, 0xff, 0xff00, 0xff0000, 0).unwrap().into(), 0);
        check(&DirectColorModel::new(16, 0xf800, 0x07e0, 0x001f, 0).unwrap().into(), 0);
        check(&DirectColorModel::new(15, 0x7c00, 0x03e0, 0x001f, 0).unwrap().into(), 0);
        check(&DirectColorModel::new(16, 0x0f00, 0x00f0, 0x000f, 0xf000).unwrap().into(), 0);
    }

    #[test]
    fn test_linear_rgb_direct_models() {
        let linear = |bits, masks| -> ColorModel {
            DirectColorModel::with_color_space(colorspace::linear_rgb(), bits, masks, false, DataType::Int)
                .unwrap()
                .into()
        };
        check(&linear(32, [0xff_0000, 0xff00, 0xff, 0xff00_0000]), 6);
        check(&linear(30, [0x3ff0_0000, 0x000f_fc00, 0x3ff, 0]), 1);
    }
}



#[cfg(test)]
mod rasters {
    use pixfmt_core::DataType;
    use pixfmt_raster::{factory, SampleLayout, SinglePixelPackedSampleModel};

    #[test]
    fn test_child_writes_visible_in_parent() {
        let parent = factory::interleaved(DataType::Byte, 8, 8, 3, Some((2, 3))).unwrap();
        let child = parent.create_writable_child(4, 5, 3, 3, 0, 0, None).unwrap();
        child.set_pixel(1, 2, &[7, 8, 9]).unwrap();
        assert_eq!(parent.pixel(5, 7).unwrap(), vec![7, 8, 9]);
        assert!(child.parent().unwrap().ptr_eq(&parent));

        let moved = parent.create_writable_child(2, 3, 2, 2, -10, -10, Some(&[2][..])).unwrap();
        moved.set_sample(-9, -9, 0, 42).unwrap();
        assert_eq!(parent.sample(3, 4, 2).unwrap(), 42);
    }

    #[test]
    fn test_packed_masks_roundtrip() {
        let raster = factory::packed(DataType::Int, 4, 4, &[0xff0000, 0x00ff00, 0x0000ff], None).unwrap();
        raster.set_pixel(2, 1, &[10, 20, 30]).unwrap();
        assert_eq!(raster.pixel(2, 1).unwrap(), vec![10, 20, 30]);
        assert_eq!(raster.data_buffer().read().elem(0, 4 + 2), 0x000A141E);

        let sm = SinglePixelPackedSampleModel::new(DataType::Int, 4, 4, &[0xff0000, 0x00ff00, 0x0000ff]).unwrap();
        assert_eq!(sm.bit_offsets(), &[16, 8, 0]);
        assert_eq!(sm.num_bands(), 3);
        assert!(SinglePixelPackedSampleModel::new(DataType::Int, 4, 4, &[0xff00ff]).is_err());
    }

    #[test]
    fn test_data_is_a_deep_copy() {
        let raster = factory::banded(DataType::UShort, 3, 3, 2, None).unwrap();
        raster.set_pixel(1, 1, &[500, 600]).unwrap();
        let copy = raster.data().unwrap();
        raster.set_pixel(1, 1, &[0, 0]).unwrap();
        assert_eq!(copy.pixel(1, 1).unwrap(), vec![500, 600]);
    }
}

#[cfg(test)]
mod images {
    use pixfmt_color::{ColorModel, ComponentColorModel};
    use pixfmt_core::{colorspace, DataType, Transparency};
    use pixfmt_image::{Image, ImageType};

    #[test]
    fn test_construction_divides_out_alpha() {
        let cm: ColorModel = ComponentColorModel::new(
            colorspace::srgb(),
            None,
            true,
            false,
            Transparency::Translucent,
            DataType::Byte,
        )
        .unwrap()
        .into();
        let raster = cm.create_compatible_writable_raster(2, 1).unwrap();
        raster.set_pixel(0, 0, &[100, 50, 25, 128]).unwrap();
        raster.set_pixel(1, 0, &[9, 9, 9, 0]).unwrap();
        assert_eq!(raster.pixel(0, 0).unwrap(), vec![100, 50, 25, 128]);

        let img = Image::from_raster(cm, raster.clone(), true).unwrap();
        assert!(!img.is_alpha_premultiplied());
        assert_eq!(img.image_type(), ImageType::Custom);
        assert_eq!(raster.pixel(0, 0).unwrap(), vec![199, 100, 50, 128]);
        assert_eq!(raster.pixel(1, 0).unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_matching_state_is_untouched() {
        let img = Image::new(1, 1, ImageType::FourByteAbgrPre).unwrap();
        img.raster().set_pixel(0, 0, &[100, 50, 25, 128]).unwrap();
        let again = Image::from_raster(img.color_model().clone(), img.raster().clone(), true).unwrap();
        assert_eq!(again.image_type(), ImageType::FourByteAbgrPre);
        assert_eq!(again.raster().pixel(0, 0).unwrap(), vec![100, 50, 25, 128]);
    }

    #[test]
    fn test_conversion_between_standard_types() {
        let src = Image::new(4, 1, ImageType::IntArgb).unwrap();
        let colors = [0xffff0000, 0xff00ff00, 0xff0000ff, 0xffffffff];
        src.set_rgb_rect(0, 0, 4, 1, &colors).unwrap();
        for ty in [ImageType::IntBgr, ImageType::ThreeByteBgr, ImageType::FourByteAbgr, ImageType::ByteIndexed] {
            let dst = Image::new(4, 1, ty).unwrap();
            src.copy_to(&dst).unwrap();
            assert_eq!(dst.rgb_rect(0, 0, 4, 1).unwrap(), colors, "{ty}");
        }
    }
}

#[cfg(test)]
mod luma {
    use std::sync::Arc;
    use std::thread;

    use pixfmt_color::{ColorModel, ComponentColorModel};
    use pixfmt_core::colorspace::{self, ColorSpaceRef, GraySpace};
    use pixfmt_core::transfer::{index_luma, linear_luma16, linear_luma16_index};
    use pixfmt_core::{DataType, Transparency};
    use pixfmt_lut::gray_luts;

    #[test]
    fn test_luma_index_is_reproducible() {
        let inputs = [(0u16, 0u16, 0u16), (1234, 40000, 65535), (65535, 1, 30000), (65535, 65535, 65535)];
        for (r, g, b) in inputs {
            let first = linear_luma16(r, g, b).to_bits();
            let index = linear_luma16_index(r, g, b);
            for _ in 0..100 {
                assert_eq!(linear_luma16(r, g, b).to_bits(), first);
                assert_eq!(linear_luma16_index(r, g, b), index);
            }
        }
        assert_eq!(linear_luma16_index(65535, 65535, 65535), 65535);
        assert_eq!(index_luma(255, 255, 255), 255);
    }

    fn gray_model(cs: ColorSpaceRef, dt: DataType) -> ColorModel {
        ComponentColorModel::new(cs, None, false, false, Transparency::Opaque, dt)
            .unwrap()
            .into()
    }

    #[test]
    fn test_gray_models_agree_across_instances() {
        let cs: ColorSpaceRef = Arc::new(GraySpace::new("gamma 2.2", 2.2));
        for dt in [DataType::Byte, DataType::UShort] {
            for space in [colorspace::linear_gray(), cs.clone()] {
                let a = gray_model(space.clone(), dt);
                let b = gray_model(space, dt);
                for argb in [0xff102030u32, 0xff808080, 0xffc0ffee] {
                    assert_eq!(a.data_elements(argb, None).unwrap(), b.data_elements(argb, None).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_gray_tables_shared_between_threads() {
        let cs: ColorSpaceRef = Arc::new(GraySpace::new("shared", 1.8));
        let tables: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| gray_luts(&cs))).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for t in &tables[1..] {
            assert_eq!(t.linear16_to_gray8, tables[0].linear16_to_gray8);
        }
        assert!(Arc::ptr_eq(&gray_luts(&cs), &gray_luts(&cs)));
    }
}
