// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub mod invoker;
pub mod lifecycle;
pub mod response;

pub use invoker::{HttpInvoker, Invoker};
pub use lifecycle::{
    ExecutionLifecycle, ExecutionRequest, LifecycleEvent, RequestToken, DEFAULT_PRESENTATION_DELAY,
};
pub use response::{
    classify, Classified, ExecutionOutcome, RawResponse, CONNECTIVITY_MESSAGE,
    SERVICE_UNAVAILABLE_MESSAGE, UNRENDERABLE_BODY,
};
