#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use vc_archive as archive;
pub use vc_object as object;
pub use vc_reflect as reflect;
pub use vc_serializer as serializer;
