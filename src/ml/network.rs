// ============================================================
// Layer 5 — Two-Layer Feed-Forward Network
// ============================================================
// A dense network with one sigmoid hidden layer and a sigmoid
// output layer, trained by plain gradient descent on MSE.
//
// Shapes (n = input, h = hidden, o = output):
//   w_ih : h × n      b_h : h
//   w_ho : o × h      b_o : o
//
// Forward:
//   z_h = W_ih · x + b_h        a_h = σ(z_h)
//   z_o = W_ho · a_h + b_o      a_o = σ(z_o)
//
// Backward (σ + MSE):
//   δ_o[i] = (a_o[i] − t[i]) · σ'(z_o[i])
//   δ_h[j] = (Σ_i δ_o[i] · W_ho[i][j]) · σ'(z_h[j])
//   dW_ho  = δ_o ⊗ a_h     db_o = δ_o
//   dW_ih  = δ_h ⊗ x       db_h = δ_h
//
// forward() takes &self and returns its intermediate values as
// a ForwardPass; backward() consumes that value. Nothing is
// cached on the network itself, so a shared &Network can serve
// any number of concurrent inferences, and update() (&mut self)
// is the only way parameters change.
//
// Reference: Rumelhart, Hinton & Williams (1986)
//            Rust Book §4 (Ownership)

use std::{fs, path::Path};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::error::EngineError;
use crate::domain::traits::Persistable;

/// Logistic function. Not clamped: large |x| saturates to
/// exactly 0.0 or 1.0.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// σ'(x) = σ(x) · (1 − σ(x)), taken at the pre-activation
pub fn sigmoid_derivative(x: f64) -> f64 {
    let s = sigmoid(x);
    s * (1.0 - s)
}

/// Mean squared error of one example
pub fn mse(prediction: &[f64], target: &[u8]) -> f64 {
    if target.is_empty() {
        return 0.0;
    }
    let sum: f64 = prediction
        .iter()
        .zip(target)
        .map(|(p, &t)| (p - f64::from(t)).powi(2))
        .sum();
    sum / target.len() as f64
}

// ─── ForwardPass ──────────────────────────────────────────────────────────────
/// Everything backward() needs from the matching forward() call.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    x:   Vec<f64>,
    z_h: Vec<f64>,
    a_h: Vec<f64>,
    z_o: Vec<f64>,
    a_o: Vec<f64>,
}

impl ForwardPass {
    /// Output activations `a_o`
    pub fn output(&self) -> &[f64] {
        &self.a_o
    }

    pub fn into_output(self) -> Vec<f64> {
        self.a_o
    }
}

// ─── Gradients ────────────────────────────────────────────────────────────────
/// Parameter gradients of one example, shaped like the parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub dw_ih: Vec<Vec<f64>>,
    pub db_h:  Vec<f64>,
    pub dw_ho: Vec<Vec<f64>>,
    pub db_o:  Vec<f64>,
}

// ─── Persisted record ─────────────────────────────────────────────────────────
// Field names are the on-disk format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NetworkRecord {
    w_ih: Vec<Vec<f64>>,
    b_h:  Vec<f64>,
    w_ho: Vec<Vec<f64>>,
    b_o:  Vec<f64>,
    lr:   f64,
}

// ─── Network ──────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    w_ih: Vec<Vec<f64>>,
    b_h:  Vec<f64>,
    w_ho: Vec<Vec<f64>>,
    b_o:  Vec<f64>,
    lr:   f64,
}

impl Network {
    /// Random network, every parameter uniform in [-1, 1).
    pub fn new(n_in: usize, n_hidden: usize, n_out: usize, lr: f64) -> Self {
        Self::with_rng(n_in, n_hidden, n_out, lr, &mut rand::thread_rng())
    }

    /// Same as [`Network::new`] with a caller-supplied RNG, for
    /// reproducible initialisation.
    pub fn with_rng<R: Rng>(
        n_in:     usize,
        n_hidden: usize,
        n_out:    usize,
        lr:       f64,
        rng:      &mut R,
    ) -> Self {
        let mut uniform = |n: usize| -> Vec<f64> {
            (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
        };

        let w_ih = (0..n_hidden).map(|_| uniform(n_in)).collect();
        let b_h  = uniform(n_hidden);
        let w_ho = (0..n_out).map(|_| uniform(n_hidden)).collect();
        let b_o  = uniform(n_out);

        tracing::debug!(
            "Initialised network {}→{}→{} (lr={})",
            n_in, n_hidden, n_out, lr
        );
        Self { w_ih, b_h, w_ho, b_o, lr }
    }

    pub fn input_size(&self) -> usize {
        self.w_ih.first().map_or(0, Vec::len)
    }

    pub fn hidden_size(&self) -> usize {
        self.w_ih.len()
    }

    pub fn output_size(&self) -> usize {
        self.w_ho.len()
    }

    /// Forward pass over a bag-of-words count vector.
    ///
    /// # Errors
    /// [`EngineError::DimensionMismatch`] if `input` is not
    /// `input_size()` long.
    pub fn forward(&self, input: &[u32]) -> Result<ForwardPass, EngineError> {
        if input.len() != self.input_size() {
            return Err(EngineError::DimensionMismatch {
                context:  "forward input",
                expected: self.input_size(),
                actual:   input.len(),
            });
        }

        let x: Vec<f64> = input.iter().map(|&c| f64::from(c)).collect();

        let z_h = affine(&self.w_ih, &self.b_h, &x);
        let a_h: Vec<f64> = z_h.iter().map(|&z| sigmoid(z)).collect();

        let z_o = affine(&self.w_ho, &self.b_o, &a_h);
        let a_o: Vec<f64> = z_o.iter().map(|&z| sigmoid(z)).collect();

        Ok(ForwardPass { x, z_h, a_h, z_o, a_o })
    }

    /// Gradients of the per-example MSE for the given forward pass.
    ///
    /// # Errors
    /// [`EngineError::DimensionMismatch`] if `target` is not as long
    /// as the pass's output.
    pub fn backward(&self, pass: &ForwardPass, target: &[u8]) -> Result<Gradients, EngineError> {
        // A pass produced by a differently shaped network
        if pass.a_h.len() != self.hidden_size() {
            return Err(EngineError::DimensionMismatch {
                context:  "forward pass hidden layer",
                expected: self.hidden_size(),
                actual:   pass.a_h.len(),
            });
        }
        if target.len() != pass.a_o.len() {
            return Err(EngineError::DimensionMismatch {
                context:  "backward target",
                expected: pass.a_o.len(),
                actual:   target.len(),
            });
        }

        // ── Output layer error ───────────────────────────────────────────────
        let delta_o: Vec<f64> = pass
            .a_o
            .iter()
            .zip(&pass.z_o)
            .zip(target)
            .map(|((&a, &z), &t)| (a - f64::from(t)) * sigmoid_derivative(z))
            .collect();

        let dw_ho = outer(&delta_o, &pass.a_h);

        // ── Propagate to the hidden layer ────────────────────────────────────
        let delta_h: Vec<f64> = (0..pass.a_h.len())
            .map(|j| {
                let error: f64 = delta_o
                    .iter()
                    .zip(&self.w_ho)
                    .map(|(d, row)| d * row[j])
                    .sum();
                error * sigmoid_derivative(pass.z_h[j])
            })
            .collect();

        let dw_ih = outer(&delta_h, &pass.x);

        Ok(Gradients {
            dw_ih,
            db_h: delta_h,
            dw_ho,
            db_o: delta_o,
        })
    }

    /// `param -= learning_rate * grad` for all four tensors.
    ///
    /// # Errors
    /// [`EngineError::DimensionMismatch`] if any gradient is shaped
    /// differently from its parameter. Nothing is modified then.
    pub fn update(&mut self, grads: &Gradients, learning_rate: f64) -> Result<(), EngineError> {
        check_matrix("dw_ih", &grads.dw_ih, &self.w_ih)?;
        check_len("db_h", grads.db_h.len(), self.b_h.len())?;
        check_matrix("dw_ho", &grads.dw_ho, &self.w_ho)?;
        check_len("db_o", grads.db_o.len(), self.b_o.len())?;

        descend_matrix(&mut self.w_ih, &grads.dw_ih, learning_rate);
        descend(&mut self.b_h, &grads.db_h, learning_rate);
        descend_matrix(&mut self.w_ho, &grads.dw_ho, learning_rate);
        descend(&mut self.b_o, &grads.db_o, learning_rate);
        Ok(())
    }

    fn to_record(&self) -> NetworkRecord {
        NetworkRecord {
            w_ih: self.w_ih.clone(),
            b_h:  self.b_h.clone(),
            w_ho: self.w_ho.clone(),
            b_o:  self.b_o.clone(),
            lr:   self.lr,
        }
    }

    /// Rebuild from a record, deriving every size from tensor shapes.
    fn from_record(record: NetworkRecord, path: &Path) -> Result<Self, EngineError> {
        let n_hidden = record.w_ih.len();
        let n_in     = record.w_ih.first().map_or(0, Vec::len);
        let n_out    = record.w_ho.len();

        if n_hidden == 0 || n_in == 0 || n_out == 0 {
            return Err(EngineError::corrupt(path, "empty layer"));
        }
        if record.w_ih.iter().any(|row| row.len() != n_in) {
            return Err(EngineError::corrupt(path, "w_ih rows have different lengths"));
        }
        if record.b_h.len() != n_hidden {
            return Err(EngineError::corrupt(
                path,
                format!("b_h has {} entries, w_ih has {} rows", record.b_h.len(), n_hidden),
            ));
        }
        if record.w_ho.iter().any(|row| row.len() != n_hidden) {
            return Err(EngineError::corrupt(
                path,
                format!("w_ho rows must have {n_hidden} columns"),
            ));
        }
        if record.b_o.len() != n_out {
            return Err(EngineError::corrupt(
                path,
                format!("b_o has {} entries, w_ho has {} rows", record.b_o.len(), n_out),
            ));
        }
        if !record.lr.is_finite() {
            return Err(EngineError::corrupt(path, "learning rate is not finite"));
        }

        Ok(Self {
            w_ih: record.w_ih,
            b_h:  record.b_h,
            w_ho: record.w_ho,
            b_o:  record.b_o,
            lr:   record.lr,
        })
    }
}

impl Persistable for Network {
    fn save(&self, path: &Path) -> Result<(), EngineError> {
        let json = serde_json::to_string(&self.to_record())
            .map_err(|e| EngineError::corrupt(path, e.to_string()))?;
        fs::write(path, json).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn load(path: &Path) -> Result<Self, EngineError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EngineError::MissingModelFile { path: path.to_path_buf() });
            }
            Err(e) => return Err(EngineError::corrupt(path, e.to_string())),
        };

        let record: NetworkRecord = serde_json::from_str(&json)
            .map_err(|e| EngineError::corrupt(path, e.to_string()))?;

        Self::from_record(record, path)
    }
}

// ─── Dense helpers ────────────────────────────────────────────────────────────

// W · v + b, one output per row of W
fn affine(w: &[Vec<f64>], b: &[f64], v: &[f64]) -> Vec<f64> {
    w.iter()
        .zip(b)
        .map(|(row, bias)| row.iter().zip(v).map(|(w, x)| w * x).sum::<f64>() + bias)
        .collect()
}

// a ⊗ b : rows indexed by a, columns by b
fn outer(a: &[f64], b: &[f64]) -> Vec<Vec<f64>> {
    a.iter().map(|&ai| b.iter().map(|&bj| ai * bj).collect()).collect()
}

fn check_len(context: &'static str, actual: usize, expected: usize) -> Result<(), EngineError> {
    if actual != expected {
        return Err(EngineError::DimensionMismatch { context, expected, actual });
    }
    Ok(())
}

// Row count first, then every row's width
fn check_matrix(
    context: &'static str,
    grad:    &[Vec<f64>],
    param:   &[Vec<f64>],
) -> Result<(), EngineError> {
    check_len(context, grad.len(), param.len())?;
    for (g, p) in grad.iter().zip(param) {
        check_len(context, g.len(), p.len())?;
    }
    Ok(())
}

fn descend(param: &mut [f64], grad: &[f64], lr: f64) {
    for (p, g) in param.iter_mut().zip(grad) {
        *p -= lr * g;
    }
}

fn descend_matrix(param: &mut [Vec<f64>], grad: &[Vec<f64>], lr: f64) {
    for (row, grad_row) in param.iter_mut().zip(grad) {
        descend(row, grad_row, lr);
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn seeded(n_in: usize, n_hidden: usize, n_out: usize) -> Network {
        Network::with_rng(n_in, n_hidden, n_out, 0.2, &mut StdRng::seed_from_u64(42))
    }

    // Hand-sized network: 2 inputs, 1 hidden, 1 output
    fn tiny() -> Network {
        Network {
            w_ih: vec![vec![0.5, -0.5]],
            b_h:  vec![0.0],
            w_ho: vec![vec![1.0]],
            b_o:  vec![0.0],
            lr:   0.1,
        }
    }

    #[test]
    fn test_sigmoid_values() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(2.0) - 0.880_797_077_977_882_3).abs() < 1e-12);
        assert_eq!(sigmoid(800.0), 1.0);
        assert_eq!(sigmoid(-800.0), 0.0);
    }

    #[test]
    fn test_sigmoid_derivative_peak() {
        assert_eq!(sigmoid_derivative(0.0), 0.25);
    }

    #[test]
    fn test_mse() {
        assert_eq!(mse(&[0.5, 0.5], &[1, 0]), 0.25);
        assert_eq!(mse(&Vec::<f64>::new(), &Vec::<u8>::new()), 0.0);
    }

    #[test]
    fn test_shapes() {
        let net = seeded(4, 3, 2);
        assert_eq!(net.input_size(), 4);
        assert_eq!(net.hidden_size(), 3);
        assert_eq!(net.output_size(), 2);
        assert_eq!(net.b_h.len(), 3);
        assert!(net.w_ho.iter().all(|row| row.len() == 3));
        assert!(net.w_ih.iter().flatten().all(|w| (-1.0..1.0).contains(w)));
    }

    #[test]
    fn test_seeded_init_is_reproducible() {
        assert_eq!(seeded(3, 2, 2), seeded(3, 2, 2));
    }

    #[test]
    fn test_forward_hand_computed() {
        let pass = tiny().forward(&[1, 0]).unwrap();
        let a_h  = sigmoid(0.5);
        assert_eq!(pass.a_h, [a_h]);
        assert_eq!(pass.output(), &[sigmoid(a_h)]);
    }

    #[test]
    fn test_forward_wrong_input_length() {
        let err = seeded(4, 3, 2).forward(&[1, 2]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DimensionMismatch { expected: 4, actual: 2, .. }
        ));
    }

    #[test]
    fn test_backward_hand_computed() {
        let net   = tiny();
        let pass  = net.forward(&[1, 0]).unwrap();
        let grads = net.backward(&pass, &[1]).unwrap();

        let z_h     = 0.5;
        let a_h     = sigmoid(z_h);
        let a_o     = sigmoid(a_h);
        let delta_o = (a_o - 1.0) * sigmoid_derivative(a_h);
        let delta_h = delta_o * 1.0 * sigmoid_derivative(z_h);

        assert_eq!(grads.db_o, vec![delta_o]);
        assert_eq!(grads.dw_ho, vec![vec![delta_o * a_h]]);
        assert_eq!(grads.db_h, vec![delta_h]);
        assert_eq!(grads.dw_ih, vec![vec![delta_h, 0.0]]);
    }

    #[test]
    fn test_gradient_shapes_match_parameters() {
        let net   = seeded(5, 3, 4);
        let pass  = net.forward(&[1, 0, 2, 0, 1]).unwrap();
        let grads = net.backward(&pass, &[0, 0, 1, 0]).unwrap();
        assert_eq!(grads.dw_ih.len(), 3);
        assert!(grads.dw_ih.iter().all(|r| r.len() == 5));
        assert_eq!(grads.db_h.len(), 3);
        assert_eq!(grads.dw_ho.len(), 4);
        assert!(grads.dw_ho.iter().all(|r| r.len() == 3));
        assert_eq!(grads.db_o.len(), 4);
    }

    #[test]
    fn test_backward_wrong_target_length_leaves_parameters() {
        let net    = seeded(3, 2, 2);
        let before = net.clone();
        let pass   = net.forward(&[1, 1, 0]).unwrap();

        let err = net.backward(&pass, &[0, 1, 0]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DimensionMismatch { expected: 2, actual: 3, .. }
        ));
        assert_eq!(net, before);
    }

    #[test]
    fn test_update_subtracts_scaled_gradient() {
        let mut net = tiny();
        let grads = Gradients {
            dw_ih: vec![vec![1.0, 2.0]],
            db_h:  vec![1.0],
            dw_ho: vec![vec![-1.0]],
            db_o:  vec![0.5],
        };
        net.update(&grads, 0.5).unwrap();
        assert_eq!(net.w_ih, [vec![0.0, -1.5]]);
        assert_eq!(net.b_h, [-0.5]);
        assert_eq!(net.w_ho, [vec![1.5]]);
        assert_eq!(net.b_o, [-0.25]);
    }

    #[test]
    fn test_update_rejects_misshaped_gradients() {
        let good = Gradients {
            dw_ih: vec![vec![1.0, 2.0]],
            db_h:  vec![1.0],
            dw_ho: vec![vec![-1.0]],
            db_o:  vec![0.5],
        };
        let bad = [
            Gradients { dw_ih: vec![vec![1.0]], ..good.clone() },
            Gradients { db_h: vec![1.0, 1.0], ..good.clone() },
            Gradients { dw_ho: vec![vec![-1.0], vec![2.0]], ..good.clone() },
            Gradients { db_o: Vec::new(), ..good.clone() },
        ];

        for grads in &bad {
            let mut net = tiny();
            let err     = net.update(grads, 0.5).unwrap_err();
            assert!(matches!(err, EngineError::DimensionMismatch { .. }));
            assert_eq!(net, tiny());
        }
    }

    #[test]
    fn test_step_reduces_loss_on_one_example() {
        let mut net = seeded(3, 4, 2);
        let x       = [1, 0, 1];
        let y       = [1, 0];

        let pass   = net.forward(&x).unwrap();
        let before = mse(pass.output(), &y);
        let grads  = net.backward(&pass, &y).unwrap();
        net.update(&grads, 0.1).unwrap();

        let after = mse(net.forward(&x).unwrap().output(), &y);
        assert!(after < before);
    }

    #[test]
    fn test_save_load_round_trip_is_exact() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("modelo.json");
        let net  = seeded(6, 5, 3);

        net.save(&path).unwrap();
        let loaded = Network::load(&path).unwrap();

        assert_eq!(loaded, net);
        let x = [1, 0, 2, 0, 0, 1];
        assert_eq!(
            loaded.forward(&x).unwrap().output(),
            net.forward(&x).unwrap().output()
        );
    }

    #[test]
    fn test_saved_file_uses_field_names() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("modelo.json");
        tiny().save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        for field in ["w_ih", "b_h", "w_ho", "b_o", "lr"] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        assert_eq!(value["lr"], 0.1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Network::load(&dir.path().join("nada.json")).unwrap_err();
        assert!(matches!(err, EngineError::MissingModelFile { .. }));
    }

    #[test]
    fn test_load_invalid_json_is_corrupt() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("modelo.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Network::load(&path).unwrap_err();
        assert!(matches!(err, EngineError::CorruptModel { .. }));
    }

    #[test]
    fn test_load_inconsistent_shapes_is_corrupt() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("modelo.json");

        let cases = [
            // b_h shorter than w_ih row count
            r#"{"w_ih":[[1.0,2.0],[3.0,4.0]],"b_h":[0.0],"w_ho":[[1.0,1.0]],"b_o":[0.0],"lr":0.2}"#,
            // ragged w_ih
            r#"{"w_ih":[[1.0,2.0],[3.0]],"b_h":[0.0,0.0],"w_ho":[[1.0,1.0]],"b_o":[0.0],"lr":0.2}"#,
            // w_ho columns != hidden size
            r#"{"w_ih":[[1.0,2.0]],"b_h":[0.0],"w_ho":[[1.0,1.0]],"b_o":[0.0],"lr":0.2}"#,
            // b_o length != w_ho rows
            r#"{"w_ih":[[1.0]],"b_h":[0.0],"w_ho":[[1.0]],"b_o":[0.0,0.0],"lr":0.2}"#,
            // empty network
            r#"{"w_ih":[],"b_h":[],"w_ho":[],"b_o":[],"lr":0.2}"#,
            // missing field
            r#"{"w_ih":[[1.0]],"b_h":[0.0],"w_ho":[[1.0]],"b_o":[0.0]}"#,
        ];

        for json in cases {
            fs::write(&path, json).unwrap();
            let err = Network::load(&path).unwrap_err();
            assert!(matches!(err, EngineError::CorruptModel { .. }), "accepted {json}");
        }
    }

    #[test]
    fn test_load_derives_sizes_from_shapes() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("modelo.json");
        fs::write(
            &path,
            r#"{"w_ih":[[1.0,2.0,3.0],[4.0,5.0,6.0]],"b_h":[0.0,0.0],"w_ho":[[1.0,1.0]],"b_o":[0.5],"lr":0.3}"#,
        )
        .unwrap();

        let net = Network::load(&path).unwrap();
        assert_eq!(net.input_size(), 3);
        assert_eq!(net.hidden_size(), 2);
        assert_eq!(net.output_size(), 1);
        assert_eq!(net.lr, 0.3);
    }
}
