//! 掩码元素切片上的算法
//!
//! 切片长度即掩码元素个数，`n` 为掩码的有效位数，`filter` 为最后一个元素中
//! 有效位的掩码（见 [`tail_filter`]）。

use crate::MASK_ELEMENT_BIT_SIZE;

/// 把全局下标拆成（元素下标，元素内偏移）
#[inline]
fn split(index: usize) -> (usize, u32) {
    (
        index / MASK_ELEMENT_BIT_SIZE,
        (index % MASK_ELEMENT_BIT_SIZE) as u32,
    )
}

/// 有效位数为 `n` 时最后一个元素中有效位的掩码
pub(crate) const fn tail_filter(n: usize) -> u32 {
    match n % MASK_ELEMENT_BIT_SIZE {
        0 => u32::MAX,
        rem => (1u32 << rem as u32) - 1,
    }
}

/// 把最后一个元素中超出有效位数的位清零
#[inline]
pub(crate) fn normalize(data: &mut [u32], filter: u32) {
    if let Some(last) = data.last_mut() {
        *last &= filter;
    }
}

pub(crate) fn get(n: usize, data: &[u32], index: usize) -> Option<bool> {
    if index >= n {
        return None;
    }

    let (element, offset) = split(index);
    data.get(element).map(|word| (word >> offset) & 1 != 0)
}

/// 设置某一位，返回该位之前的值
pub(crate) fn set(n: usize, data: &mut [u32], index: usize, value: bool) -> Option<bool> {
    if index >= n {
        return None;
    }

    let (element, offset) = split(index);
    let word = data.get_mut(element)?;
    let bit = 1u32 << offset;
    let prev = *word & bit != 0;
    if value {
        *word |= bit;
    } else {
        *word &= !bit;
    }
    Some(prev)
}

pub(crate) fn set_all(data: &mut [u32], filter: u32, value: bool) {
    data.fill(if value { u32::MAX } else { 0 });
    normalize(data, filter);
}

pub(crate) fn invert(data: &mut [u32], filter: u32) {
    for word in data.iter_mut() {
        *word = !*word;
    }
    normalize(data, filter);
}

pub(crate) fn count(data: &[u32]) -> usize {
    data.iter().map(|word| word.count_ones() as usize).sum()
}

pub(crate) fn first_index(data: &[u32]) -> Option<usize> {
    data.iter()
        .enumerate()
        .find(|(_, word)| **word != 0)
        .map(|(i, word)| i * MASK_ELEMENT_BIT_SIZE + word.trailing_zeros() as usize)
}

/// 从最高的元素开始向下扫描，返回整个掩码中最高的置位
pub(crate) fn last_index(n: usize, data: &[u32]) -> Option<usize> {
    data.iter()
        .enumerate()
        .rev()
        .find(|(_, word)| **word != 0)
        .map(|(i, word)| {
            i * MASK_ELEMENT_BIT_SIZE + (MASK_ELEMENT_BIT_SIZE - 1 - word.leading_zeros() as usize)
        })
        .filter(|idx| *idx < n)
}

/// `index` 之后（不含）第一个为1的位
pub(crate) fn next_index(n: usize, data: &[u32], index: usize) -> Option<usize> {
    let start = index.checked_add(1)?;
    if start >= n {
        return None;
    }

    let (first, offset) = split(start);
    data.iter()
        .enumerate()
        .skip(first)
        .find_map(|(i, word)| {
            let word = if i == first {
                *word & (u32::MAX << offset)
            } else {
                *word
            };
            (word != 0).then(|| i * MASK_ELEMENT_BIT_SIZE + word.trailing_zeros() as usize)
        })
        .filter(|idx| *idx < n)
}

pub(crate) fn is_empty(data: &[u32]) -> bool {
    data.iter().all(|word| *word == 0)
}

pub(crate) fn is_full(data: &[u32], filter: u32) -> bool {
    let Some((last, rest)) = data.split_last() else {
        return false;
    };

    rest.iter().all(|word| *word == u32::MAX) && *last == filter
}

/// `op1` 中置位的每一位在 `op2` 中也置位
pub(crate) fn is_subset(op1: &[u32], op2: &[u32]) -> bool {
    op1.iter().zip(op2.iter()).all(|(a, b)| (a & b) == *a)
}

/// 逐元素计算 `dst[i] = f(op1[i], op2[i])`
pub(crate) fn combine(dst: &mut [u32], op1: &[u32], op2: &[u32], f: impl Fn(u32, u32) -> u32) {
    for ((d, a), b) in dst.iter_mut().zip(op1.iter()).zip(op2.iter()) {
        *d = f(*a, *b);
    }
}
