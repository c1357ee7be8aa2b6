//! Calculatrice scientifique multiprécision.
//!
//! Une expression d'une ligne est lue en arbre, puis soit évaluée à une précision binaire
//! choisie (2 à 8192 bits, 256 par défaut), soit simplifiée symboliquement.
//!
//! ```no_run
//! use calculatrice_mp::{parse_and_evaluate, Contexte};
//!
//! let mut ctx = Contexte::new()?;
//! let ev = parse_and_evaluate("2(3+4)", 256, &mut ctx)?;
//! assert!(ev.est_entier);
//! # Ok::<(), calculatrice_mp::Erreur>(())
//! ```

pub mod noyau;

pub use noyau::{
    parse_and_evaluate, parse_and_simplify, set_precision, Contexte, Erreur, Evaluation, Expr,
    Simplification,
};
