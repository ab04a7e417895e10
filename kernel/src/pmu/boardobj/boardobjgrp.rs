use alloc::vec::Vec;

use bitflags::bitflags;
use boardobjgrp_mask::{
    BoardObjGrpMask, BoardObjGrpMaskE255, BoardObjGrpMaskE32, CtrlBoardObjGrpMask,
};
use log::{debug, warn};
use system_error::SystemError;

use super::BoardObj;

bitflags! {
    /// 对象组的构造状态
    pub struct BoardObjGrpFlags: u32 {
        /// 软件状态已构造
        const CONSTRUCTED = 1 << 0;
        /// 已向 PMU 下发过对象表
        const PMU_CONSTRUCTED = 1 << 1;
    }
}

/// 每个对象在负载中的头部：对象类型与对象下标
const BOARDOBJ_HDR_SIZE: usize = 2;

/// 板级对象组
///
/// `mask` 中置位的下标与 `objects` 中非空的槽位一一对应。
/// 对象组本身不加锁，共享时由持有者串行化访问。
pub struct BoardObjGrp<T: BoardObj> {
    mask: BoardObjGrpMask,
    objects: Vec<Option<T>>,
    flags: BoardObjGrpFlags,
}

/// 对象组的 SET 命令负载
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardObjGrpSetPayload {
    /// 本次下发的对象
    pub mask: CtrlBoardObjGrpMask,
    /// 按下标升序排列的 `[类型, 下标, 对象数据...]`
    pub objects: Vec<u8>,
}

impl BoardObjGrpSetPayload {
    /// 拼接为完整的命令负载：先是掩码，再是对象表
    pub fn to_bytes(&self) -> Vec<u8> {
        let mask = self.mask.to_bytes();
        let mut buf = Vec::with_capacity(mask.len() + self.objects.len());
        buf.extend_from_slice(&mask);
        buf.extend_from_slice(&self.objects);
        buf
    }
}

impl<T: BoardObj> BoardObjGrp<T> {
    /// 创建最多容纳32个对象的组
    pub fn new_e32() -> Self {
        Self::with_mask(BoardObjGrpMaskE32::new().into())
    }

    /// 创建最多容纳255个对象的组
    pub fn new_e255() -> Self {
        Self::with_mask(BoardObjGrpMaskE255::new().into())
    }

    fn with_mask(mask: BoardObjGrpMask) -> Self {
        let capacity = mask.bit_count() as usize;
        let mut objects = Vec::with_capacity(capacity);
        objects.resize_with(capacity, || None);

        debug!("boardobjgrp: constructed, capacity {}", capacity);
        Self {
            mask,
            objects,
            flags: BoardObjGrpFlags::CONSTRUCTED,
        }
    }

    /// 组最多容纳的对象数
    #[inline]
    pub fn capacity(&self) -> u8 {
        self.mask.bit_count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mask.count_set_bits() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mask.is_zero()
    }

    /// 当前成员的掩码
    #[inline]
    pub fn mask(&self) -> &BoardObjGrpMask {
        &self.mask
    }

    #[inline]
    pub fn flags(&self) -> BoardObjGrpFlags {
        self.flags
    }

    /// 把对象插入到 `idx` 槽位
    ///
    /// ## 返回
    ///
    /// - `Err(SystemError::EINVAL)` - `idx` 超出组的容量
    /// - `Err(SystemError::EEXIST)` - 槽位已被占用
    pub fn insert(&mut self, idx: u8, obj: T) -> Result<(), SystemError> {
        if idx >= self.capacity() {
            warn!(
                "boardobjgrp: insert index {} beyond capacity {}",
                idx,
                self.capacity()
            );
            return Err(SystemError::EINVAL);
        }
        if self.mask.get_bit(idx) {
            warn!("boardobjgrp: slot {} already occupied", idx);
            return Err(SystemError::EEXIST);
        }

        self.mask.set_bit(idx)?;
        self.objects[idx as usize] = Some(obj);
        Ok(())
    }

    /// 移除 `idx` 槽位中的对象
    ///
    /// ## 返回
    ///
    /// - `Err(SystemError::EINVAL)` - `idx` 超出组的容量
    /// - `Err(SystemError::ENOENT)` - 槽位为空
    pub fn remove(&mut self, idx: u8) -> Result<T, SystemError> {
        if idx >= self.capacity() {
            return Err(SystemError::EINVAL);
        }

        let obj = self.objects[idx as usize]
            .take()
            .ok_or(SystemError::ENOENT)?;
        self.mask.clear_bit(idx)?;
        Ok(obj)
    }

    pub fn get(&self, idx: u8) -> Option<&T> {
        self.objects.get(idx as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, idx: u8) -> Option<&mut T> {
        self.objects.get_mut(idx as usize)?.as_mut()
    }

    /// 按下标升序迭代所有对象
    pub fn iter(&self) -> impl Iterator<Item = (u8, &T)> + '_ {
        self.mask
            .iter()
            .filter_map(move |idx| self.objects[idx as usize].as_ref().map(|obj| (idx, obj)))
    }

    /// 成员掩码与 `filter` 的交集
    ///
    /// `filter` 的位数必须与组相同，否则返回 `EINVAL`。
    pub fn filter(&self, filter: &BoardObjGrpMask) -> Result<BoardObjGrpMask, SystemError> {
        let mut result = self.mask.clone();
        BoardObjGrpMask::and(&mut result, &self.mask, filter)?;
        Ok(result)
    }

    /// `mask` 中的对象都在组中
    pub fn contains_all(&self, mask: &BoardObjGrpMask) -> bool {
        BoardObjGrpMask::is_subset(mask, &self.mask)
    }

    /// 生成 SET 命令负载
    ///
    /// ## 参数
    ///
    /// - `filter`：只下发其中置位的对象，为 `None` 时下发全部对象。
    ///   其中的对象必须都在组中。
    pub fn pmu_set_payload(
        &self,
        filter: Option<&BoardObjGrpMask>,
    ) -> Result<BoardObjGrpSetPayload, SystemError> {
        let selected = match filter {
            Some(filter) => {
                if !self.contains_all(filter) {
                    warn!("boardobjgrp: filter {:?} is not a subset of the group", filter);
                    return Err(SystemError::EINVAL);
                }
                filter
            }
            None => &self.mask,
        };

        let mut mask = CtrlBoardObjGrpMask::new();
        selected.export(self.capacity(), &mut mask)?;

        let mut objects =
            Vec::with_capacity(selected.count_set_bits() as usize * BOARDOBJ_HDR_SIZE);
        for idx in selected.iter() {
            let obj = self.objects[idx as usize]
                .as_ref()
                .ok_or(SystemError::ENOENT)?;
            objects.push(obj.obj_type());
            objects.push(idx);
            obj.pmu_data(&mut objects)?;
        }

        Ok(BoardObjGrpSetPayload { mask, objects })
    }

    /// 下发全部对象，并标记组已在 PMU 中构造
    pub fn pmu_setup(&mut self) -> Result<BoardObjGrpSetPayload, SystemError> {
        let payload = self.pmu_set_payload(None)?;
        self.flags.insert(BoardObjGrpFlags::PMU_CONSTRUCTED);
        debug!(
            "boardobjgrp: pmu setup, {} objects, {} bytes",
            self.len(),
            payload.objects.len()
        );
        Ok(payload)
    }

    /// 按组的位数解析固件返回的掩码
    pub fn pmu_parse_mask(
        &self,
        extmask: &CtrlBoardObjGrpMask,
    ) -> Result<BoardObjGrpMask, SystemError> {
        BoardObjGrpMask::new(self.capacity(), Some(extmask))
    }
}
