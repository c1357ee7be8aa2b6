// src/noyau/speciales.rs
//
// Valeurs exactes des fonctions (simplification symbolique)
// --------------------------------------------------------
// - sqrt : 0, 1, carrés parfaits, extraction k·√m
// - sin/cos/tan aux multiples rationnels k·π/n, n ∈ {1,2,3,4,6}
//   (réduction modulo 2π ; tan(π/2 + kπ) n'est pas touché)
// - log(1), log(e), log10(1), log10(10), exp(0), exp(1)
// - abs d'un littéral numérique

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};

use super::canon::extrait_carre_parfait;
use super::expr::{Expr, OpBinaire, OpUnaire};
use super::precision::Contexte;
use super::registre::Fonction;
use super::simplification::{binop, unaire};

/// Appel dont les arguments sont déjà simplifiés.
pub(crate) fn fonction(f: Fonction, args: Vec<Expr>, ctx: &mut Contexte) -> Expr {
    let special = match (f, args.as_slice()) {
        (Fonction::Sqrt, [x]) => racine(x, ctx),
        (Fonction::Sin | Fonction::Cos | Fonction::Tan, [x]) => trigo(f, x, ctx),

        (Fonction::Log, [x]) if x.est_un() => Some(Expr::entier(0, ctx)),
        (Fonction::Log, [x]) if x.est_constante("e") => Some(Expr::entier(1, ctx)),
        (Fonction::Log10, [x]) if x.est_un() => Some(Expr::entier(0, ctx)),
        (Fonction::Log10, [x]) if x.comme_entier() == Some(&BigInt::from(10)) => {
            Some(Expr::entier(1, ctx))
        }
        (Fonction::Exp, [x]) if x.est_zero() => Some(Expr::entier(1, ctx)),
        (Fonction::Exp, [x]) if x.est_un() => Some(Expr::Constante("e".into())),

        (Fonction::Abs, [Expr::Nombre(n)]) => Some(Expr::Nombre(n.clone())),
        (Fonction::Abs, [Expr::Unaire(OpUnaire::Moins, x)]) if matches!(**x, Expr::Nombre(_)) => {
            Some((**x).clone())
        }

        _ => None,
    };

    match special {
        Some(e) => {
            log::trace!("valeur exacte: {}({}) = {e}", f.nom(), args_texte(&args));
            e
        }
        None => Expr::Appel(f, args),
    }
}

fn args_texte(args: &[Expr]) -> String {
    args.iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/* ------------------------ racines ------------------------ */

fn racine(x: &Expr, ctx: &mut Contexte) -> Option<Expr> {
    let n = x.comme_entier()?;
    if n.is_zero() || n.is_one() {
        return Some(x.clone());
    }

    let (s, reste) = extrait_carre_parfait(n);
    if s.is_one() {
        return None;
    }
    if reste.is_one() {
        return Some(Expr::entier(s, ctx));
    }

    let s = Expr::entier(s, ctx);
    let reste = Expr::entier(reste, ctx);
    let r = fonction(Fonction::Sqrt, vec![reste], ctx);
    Some(binop(OpBinaire::Fois, s, r, ctx))
}

/* ------------------------ trigonométrie ------------------------ */

/// Reconnaît x = (k/n)·π sur les formes produites par la simplification :
/// 0, pi, k*pi, u/d, -u  (k, d entiers).
fn coeff_pi(x: &Expr) -> Option<(i64, i64)> {
    match x {
        Expr::Nombre(n) if n.est_zero() => Some((0, 1)),
        Expr::Constante(c) if c == "pi" => Some((1, 1)),
        Expr::BinOp(OpBinaire::Fois, k, p) if p.est_constante("pi") => {
            Some((k.comme_entier()?.to_i64()?, 1))
        }
        Expr::BinOp(OpBinaire::Divise, u, d) => {
            let d = d.comme_entier()?.to_i64()?;
            let (k, n) = coeff_pi(u)?;
            if d == 0 {
                return None;
            }
            Some((k, n.checked_mul(d)?))
        }
        Expr::Unaire(OpUnaire::Moins, u) => {
            let (k, n) = coeff_pi(u)?;
            Some((k.checked_neg()?, n))
        }
        _ => None,
    }
}

fn gcd_i64(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.abs()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Valeur {
    Zero,
    Un,
    Demi,
    Racine2Sur2,
    Racine3Sur2,
    Racine3Sur3,
    Racine3,
}

/// Table sur [0, 2π) : k_mod ∈ [0, 2n). Renvoie (négatif, valeur absolue).
fn table(f: Fonction, k: i64, n: i64) -> Option<(bool, Valeur)> {
    use Valeur::*;

    let v = match f {
        Fonction::Sin => match (k, n) {
            (0, 1) | (1, 1) => (false, Zero),
            (1, 2) => (false, Un),
            (3, 2) => (true, Un),
            (1, 3) | (2, 3) => (false, Racine3Sur2),
            (4, 3) | (5, 3) => (true, Racine3Sur2),
            (1, 4) | (3, 4) => (false, Racine2Sur2),
            (5, 4) | (7, 4) => (true, Racine2Sur2),
            (1, 6) | (5, 6) => (false, Demi),
            (7, 6) | (11, 6) => (true, Demi),
            _ => return None,
        },
        Fonction::Cos => match (k, n) {
            (0, 1) => (false, Un),
            (1, 1) => (true, Un),
            (1, 2) | (3, 2) => (false, Zero),
            (1, 3) | (5, 3) => (false, Demi),
            (2, 3) | (4, 3) => (true, Demi),
            (1, 4) | (7, 4) => (false, Racine2Sur2),
            (3, 4) | (5, 4) => (true, Racine2Sur2),
            (1, 6) | (11, 6) => (false, Racine3Sur2),
            (5, 6) | (7, 6) => (true, Racine3Sur2),
            _ => return None,
        },
        Fonction::Tan => match (k, n) {
            (0, 1) | (1, 1) => (false, Zero),
            (1, 3) | (4, 3) => (false, Racine3),
            (2, 3) | (5, 3) => (true, Racine3),
            (1, 4) | (5, 4) => (false, Un),
            (3, 4) | (7, 4) => (true, Un),
            (1, 6) | (7, 6) => (false, Racine3Sur3),
            (5, 6) | (11, 6) => (true, Racine3Sur3),
            // π/2 + kπ : indéfini, laissé tel quel
            _ => return None,
        },
        _ => return None,
    };
    Some(v)
}

/// √r/d (d = 1 : √r seul)
fn racine_sur(r: i32, d: i32, ctx: &mut Contexte) -> Expr {
    let r = Expr::entier(r, ctx);
    let rac = fonction(Fonction::Sqrt, vec![r], ctx);
    if d == 1 {
        return rac;
    }
    let d = Expr::entier(d, ctx);
    binop(OpBinaire::Divise, rac, d, ctx)
}

fn construire(v: Valeur, ctx: &mut Contexte) -> Expr {
    match v {
        Valeur::Zero => Expr::entier(0, ctx),
        Valeur::Un => Expr::entier(1, ctx),
        Valeur::Demi => {
            let (un, deux) = (Expr::entier(1, ctx), Expr::entier(2, ctx));
            binop(OpBinaire::Divise, un, deux, ctx)
        }
        Valeur::Racine2Sur2 => racine_sur(2, 2, ctx),
        Valeur::Racine3Sur2 => racine_sur(3, 2, ctx),
        Valeur::Racine3Sur3 => racine_sur(3, 3, ctx),
        Valeur::Racine3 => racine_sur(3, 1, ctx),
    }
}

fn trigo(f: Fonction, x: &Expr, ctx: &mut Contexte) -> Option<Expr> {
    let (k, n) = coeff_pi(x)?;
    let g = gcd_i64(k, n);
    let (k, n) = if n < 0 { (-k / g, -n / g) } else { (k / g, n / g) };
    if ![1, 2, 3, 4, 6].contains(&n) {
        return None;
    }
    let k_mod = k.rem_euclid(2 * n);

    let (negatif, v) = table(f, k_mod, n)?;
    let e = construire(v, ctx);
    Some(if negatif {
        unaire(OpUnaire::Moins, e)
    } else {
        e
    })
}
