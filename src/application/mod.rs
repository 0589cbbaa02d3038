// ============================================================
// Application Layer
// ============================================================

/// The training workflow: corpus → vocabulary → sampler → loop
pub mod train_use_case;

/// The generation workflow: checkpoint → primed sampling → text
pub mod generate_use_case;
