// Copyright (C) 2025, Cloudflare, Inc.
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are
// met:
//
//     * Redistributions of source code must retain the above copyright notice,
//       this list of conditions and the following disclaimer.
//
//     * Redistributions in binary form must reproduce the above copyright
//       notice, this list of conditions and the following disclaimer in the
//       documentation and/or other materials provided with the distribution.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS
// IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO,
// THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR
// PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR
// CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL,
// EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO,
// PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
// PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF
// LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING
// NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE OF THIS
// SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Sequence number allocation for a new sending window.

use crate::Error;
use crate::Result;

/// Returns the sequence numbers of the window following `base`.
///
/// The window holds `size` consecutive numbers starting right after `base`,
/// i.e. `[base + 1, ..., base + size]`. Callers clamp `size` to at least 1;
/// a zero size is rejected with [`Error::InvalidArgument`].
///
/// [`Error::InvalidArgument`]: ../enum.Error.html#variant.InvalidArgument
pub fn next_window(base: u64, size: u64) -> Result<Vec<u64>> {
    if size < 1 {
        return Err(Error::InvalidArgument("window size"));
    }

    let end = base
        .checked_add(size)
        .ok_or(Error::InvalidArgument("window size"))?;

    Ok((base + 1..=end).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_after_base() {
        assert_eq!(next_window(0, 1), Ok(vec![1]));
        assert_eq!(next_window(3, 4), Ok(vec![4, 5, 6, 7]));
    }

    #[test]
    fn zero_size() {
        assert_eq!(next_window(7, 0), Err(Error::InvalidArgument("window size")));
    }

    #[test]
    fn overflowing_window() {
        assert!(next_window(u64::MAX - 1, 2).is_err());
        assert_eq!(next_window(u64::MAX - 1, 1), Ok(vec![u64::MAX]));
    }

    #[test]
    fn deterministic() {
        assert_eq!(next_window(10, 5), next_window(10, 5));
    }
}
