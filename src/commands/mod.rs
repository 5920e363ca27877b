// Copyright (c) Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod users;
pub mod assets;
pub mod patrimoine;
pub mod dashboard;
pub mod tax;
pub mod export;
pub mod doctor;
