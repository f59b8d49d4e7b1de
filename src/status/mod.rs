// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub mod lock;
pub mod presenter;

pub use lock::LockStateMirror;
pub use presenter::{
    present, IconKind, StatusEvent, StatusKind, StatusView, DONE_MESSAGE, LOCKED_MESSAGE,
    RUNNING_MESSAGE,
};
