// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![allow(unused_parens)]

#[macro_use]
extern crate markup5ever;

pub use markup5ever::*;
pub use driver::{parse_document, parse_fragment, ParseOpts, Parser};

pub use serialize::serialize;

#[macro_use]
mod macros;

mod util {
    pub mod str;
}

pub mod driver;
pub mod serialize;
pub mod tokenizer;
pub mod tree_builder;

/// Re-export the `tendril` crate, so that consumers don't have to line up
/// their copy's version with the one this crate was built against.
pub use tendril;
