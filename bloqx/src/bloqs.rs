// bloqx - Rust library for building and costing quantum algorithms
//         from composable, typed bloqs
// Copyright (C) 2025 - the bloqx developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The bloq catalog: concrete gates, subroutines and algorithm primitives,
//! organized by domain.

pub mod arithmetic;
pub mod basic;
pub mod chemistry;
pub mod data_loading;
pub mod factoring;
pub mod gf_arithmetic;
pub mod ising;
pub mod mcmt;
pub mod multiplexers;
pub mod qubitization;
pub mod rotations;
pub mod state_preparation;
pub mod swap_network;
pub mod util;
