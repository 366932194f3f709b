// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

pub mod macros;
pub mod path;
pub mod track;
