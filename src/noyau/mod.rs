//! Noyau multiprécision
//!
//! Organisation interne :
//! - jetons.rs         : lexeur (jetons à la demande, texte exact des littéraux)
//! - registre.rs       : fonctions (arité) et constantes nommées
//! - analyse.rs        : descente récursive + multiplication implicite + garde de profondeur
//! - expr.rs           : arbre, égalité structurelle, rendu infixe
//! - precision.rs      : Contexte (précision, arrondi, cache des constantes, dernière erreur)
//! - constantes.rs     : π, e, ln2, ln10, γ, √2
//! - lecture.rs        : évaluation numérique avec bits de garde
//! - canon.rs          : ordre canonique + outils entiers
//! - simplification.rs : réécriture ascendante en une passe
//! - speciales.rs      : valeurs exactes des fonctions
//! - eval.rs           : pipeline complet
//! - erreur.rs         : taxonomie des erreurs

pub mod analyse;
pub mod canon;
pub mod constantes;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod jetons;
pub mod lecture;
pub mod precision;
pub mod registre;
pub mod simplification;
pub mod speciales;

#[cfg(test)]
mod tests_scientifiques;


// API publique minimale
pub use erreur::Erreur;
pub use eval::{parse_and_evaluate, parse_and_simplify, set_precision, Evaluation, Simplification};
pub use expr::Expr;
pub use precision::Contexte;
