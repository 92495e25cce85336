// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

#![allow(
    clippy::single_match,
    clippy::needless_return,
    clippy::len_zero
)]

pub mod driver;
pub mod graph;
pub mod runtime;
pub mod util;
