#![no_std]
#![allow(clippy::needless_return)]
#![allow(clippy::upper_case_acronyms)]

#[cfg(feature = "std")]
extern crate std;

use core::fmt;

use num_derive::{FromPrimitive, ToPrimitive};

/// nvgpu 各层共用的错误码
///
/// 取值与 posix errno 一致，驱动向上层返回时使用 [`SystemError::to_posix_errno`]
/// 得到的负数。
#[repr(i32)]
#[derive(Debug, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy)]
#[allow(dead_code, non_camel_case_types)]
pub enum SystemError {
    /// 操作不被允许 Operation not permitted.
    EPERM = 1,
    /// 没有指定的对象 No such entry.
    ENOENT = 2,
    /// I/O错误 I/O error.
    EIO = 5,
    /// 没有足够的空间 Not enough space.
    ENOMEM = 12,
    /// 设备或资源忙 Device or resource busy.
    EBUSY = 16,
    /// 对象已存在 Entry exists.
    EEXIST = 17,
    /// 没有指定的设备 No such device.
    ENODEV = 19,
    /// 不可用的参数 Invalid argument.
    EINVAL = 22,
    /// 设备上没有空间 No space left on device.
    ENOSPC = 28,
    /// 结果过大 Result too large.
    ERANGE = 34,
    /// 不支持的操作 Not supported.
    EOPNOTSUPP_OR_ENOTSUP = 95,
    /// 连接超时 Connection timed out.
    ETIMEDOUT = 110,
}

impl SystemError {
    /// @brief 把posix错误码转换为系统错误枚举类型。
    pub fn from_posix_errno(errno: i32) -> Option<SystemError> {
        // posix 错误码是小于0的
        if errno >= 0 {
            return None;
        }
        return <Self as num_traits::FromPrimitive>::from_i32(errno.checked_neg()?);
    }

    /// @brief 把系统错误枚举类型转换为负数posix错误码。
    pub fn to_posix_errno(&self) -> i32 {
        return -(*self as i32);
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.to_posix_errno())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SystemError {}
