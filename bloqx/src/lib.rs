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

pub mod phase;
pub mod dtype;
pub mod register;
pub mod bloq;
pub mod builder;
pub mod composite;
pub mod bloqs;
pub mod tcomplexity;
pub mod callgraph;
pub mod classical;
pub mod tensor;
pub mod drawing;
pub mod json;
pub mod surface_code;
pub mod catalog;
pub mod cli;
