use alloc::string::String;
use alloc::vec::Vec;
use core::alloc::Layout;

use crate::{ErrorCode, JsonError};

#[inline]
fn check_reserve_len<T>(len: usize, additional: usize, offset: usize) -> Result<(), JsonError> {
    let needed = len
        .checked_add(additional)
        .ok_or_else(|| JsonError::new(ErrorCode::LengthOverflow, offset))?;
    Layout::array::<T>(needed).map_err(|_| JsonError::new(ErrorCode::LengthOverflow, offset))?;
    Ok(())
}

#[inline]
pub fn try_reserve<T>(v: &mut Vec<T>, additional: usize, offset: usize) -> Result<(), JsonError> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or_else(|| JsonError::new(ErrorCode::LengthOverflow, offset))?;
    if needed <= v.capacity() {
        return Ok(());
    }
    check_reserve_len::<T>(v.len(), additional, offset)?;
    v.try_reserve(additional)
        .map_err(|_| JsonError::new(ErrorCode::AllocationFailed, offset))
}

#[inline]
pub fn try_string_from_str(s: &str, offset: usize) -> Result<String, JsonError> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())
        .map_err(|_| JsonError::new(ErrorCode::AllocationFailed, offset))?;
    out.push_str(s);
    Ok(out)
}
