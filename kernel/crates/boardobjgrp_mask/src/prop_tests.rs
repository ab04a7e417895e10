use proptest::prelude::*;

use crate::*;

/// 属性测试：随机构造两种位数的掩码，检查集合运算与规格化的不变量。
mod prop {
    use super::*;

    fn bitsize() -> impl Strategy<Value = u8> {
        prop_oneof![Just(E32_MAX_OBJECTS), Just(E255_MAX_OBJECTS)]
    }

    /// 任意的固件掩码，包括超出位数的脏位
    fn ctrl_mask() -> impl Strategy<Value = CtrlBoardObjGrpMask> {
        any::<[u32; MASK_ARRAY_MAX_SIZE]>().prop_map(|data| CtrlBoardObjGrpMask { data })
    }

    fn make(bitsize: u8, ext: &CtrlBoardObjGrpMask) -> BoardObjGrpMask {
        BoardObjGrpMask::new(bitsize, Some(ext)).unwrap()
    }

    fn tail_is_clean(mask: &BoardObjGrpMask) -> bool {
        mask.data()[mask.data_count() - 1] & !mask.last_mask_filter() == 0
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

        #[test]
        fn prop_import_normalizes(bitsize in bitsize(), ext in ctrl_mask()) {
            let mask = make(bitsize, &ext);
            prop_assert!(tail_is_clean(&mask));
            prop_assert!(mask.count_set_bits() <= bitsize);
        }

        #[test]
        fn prop_invert_twice_is_identity(bitsize in bitsize(), ext in ctrl_mask()) {
            let orig = make(bitsize, &ext);
            let mut mask = orig.clone();
            mask.invert();
            prop_assert!(tail_is_clean(&mask));
            prop_assert_eq!(
                mask.count_set_bits() as usize + orig.count_set_bits() as usize,
                bitsize as usize
            );
            mask.invert();
            prop_assert_eq!(mask, orig);
        }

        #[test]
        fn prop_export_import_round_trip(bitsize in bitsize(), ext in ctrl_mask()) {
            let orig = make(bitsize, &ext);
            let mut wire = CtrlBoardObjGrpMask::new();
            orig.export(bitsize, &mut wire).unwrap();

            let mut copy = BoardObjGrpMask::new(bitsize, None).unwrap();
            copy.fill();
            copy.clear();
            copy.import(bitsize, &wire).unwrap();
            prop_assert_eq!(copy, orig);
        }

        #[test]
        fn prop_and_is_subset_of_operands(
            bitsize in bitsize(),
            a in ctrl_mask(),
            b in ctrl_mask(),
        ) {
            let a = make(bitsize, &a);
            let b = make(bitsize, &b);
            let mut dst = BoardObjGrpMask::new(bitsize, None).unwrap();

            BoardObjGrpMask::and(&mut dst, &a, &b).unwrap();
            prop_assert!(BoardObjGrpMask::is_subset(&dst, &a));
            prop_assert!(BoardObjGrpMask::is_subset(&dst, &b));

            let mut union = BoardObjGrpMask::new(bitsize, None).unwrap();
            BoardObjGrpMask::or(&mut union, &a, &b).unwrap();
            prop_assert!(BoardObjGrpMask::is_subset(&a, &union));
            prop_assert!(BoardObjGrpMask::is_subset(&b, &union));
            prop_assert!(tail_is_clean(&union));

            // |a ^ b| = |a | b| - |a & b|
            let mut diff = BoardObjGrpMask::new(bitsize, None).unwrap();
            BoardObjGrpMask::xor(&mut diff, &a, &b).unwrap();
            prop_assert_eq!(
                diff.count_set_bits(),
                union.count_set_bits() - dst.count_set_bits()
            );
        }

        #[test]
        fn prop_iter_matches_get_bit(bitsize in bitsize(), ext in ctrl_mask()) {
            let mask = make(bitsize, &ext);
            let set: std::vec::Vec<u8> = mask.iter().collect();

            prop_assert_eq!(set.len(), mask.count_set_bits() as usize);
            prop_assert!(set.windows(2).all(|w| w[0] < w[1]));
            for idx in 0..bitsize {
                prop_assert_eq!(mask.get_bit(idx), set.contains(&idx));
            }
            prop_assert_eq!(set.first().copied(), mask.lowest_index());
            prop_assert_eq!(set.last().copied(), mask.highest_index());
        }

        #[test]
        fn prop_single_bit_ops(bitsize in bitsize(), ext in ctrl_mask(), idx in any::<u8>()) {
            let mut mask = make(bitsize, &ext);
            let before = mask.clone();

            if idx >= bitsize {
                prop_assert!(mask.set_bit(idx).is_err());
                prop_assert!(mask.toggle_bit(idx).is_err());
                prop_assert!(!mask.get_bit(idx));
                prop_assert_eq!(mask, before);
                return Ok(());
            }

            mask.toggle_bit(idx).unwrap();
            prop_assert_eq!(mask.get_bit(idx), !before.get_bit(idx));
            let mut diff = BoardObjGrpMask::new(bitsize, None).unwrap();
            BoardObjGrpMask::xor(&mut diff, &mask, &before).unwrap();
            prop_assert_eq!(diff.iter().collect::<std::vec::Vec<_>>(), vec![idx]);

            mask.set_bit(idx).unwrap();
            prop_assert!(mask.get_bit(idx));
            mask.clear_bit(idx).unwrap();
            prop_assert!(!mask.get_bit(idx));
            prop_assert!(tail_is_clean(&mask));
        }

        #[test]
        fn prop_mixed_sizes_rejected(a in ctrl_mask(), b in ctrl_mask()) {
            let small = make(E32_MAX_OBJECTS, &a);
            let large = make(E255_MAX_OBJECTS, &b);
            let mut dst = BoardObjGrpMask::new(E255_MAX_OBJECTS, None).unwrap();

            prop_assert!(BoardObjGrpMask::and(&mut dst, &large, &small).is_err());
            prop_assert!(BoardObjGrpMask::or(&mut dst, &small, &large).is_err());
            prop_assert!(BoardObjGrpMask::xor(&mut dst, &large, &small).is_err());
            prop_assert!(BoardObjGrpMask::copy(&mut dst, &small).is_err());
            prop_assert!(!BoardObjGrpMask::is_subset(&small, &large));
            prop_assert!(dst.is_zero());
        }
    }
}
