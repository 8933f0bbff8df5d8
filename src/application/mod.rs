// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (training, or holding a conversation).
//
// Rules for this layer:
//   - No network math here (that's Layer 5)
//   - No printing or stdin here (that's Layer 1)
//   - Only workflow coordination and conversation policy
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// One conversational turn, with load-or-train startup
pub mod ask_use_case;

// What the user has told us so far
pub mod context;
