// src/noyau/canon.rs
//
// Ordre canonique (total, déterministe) sur les arbres :
//   Nombre < Constante < Appel < BinOp < Unaire, puis champ par champ
// - compatible avec l'égalité structurelle : Equal <=> arbres égaux
// - + et * : le plus petit opérande passe à gauche
//
// + outils entiers du simplificateur (racine entière, extraction de carrés parfaits)

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::expr::{Expr, OpBinaire};

/// Au-delà de u64, on ne cherche plus de facteur carré par division d'essai
/// (seul un reste carré parfait est encore reconnu).
pub const DIVISEUR_ESSAI_MAX: u32 = 100_000;

/* ------------------------ clef de tri ------------------------ */

fn rang(e: &Expr) -> u8 {
    match e {
        Expr::Nombre(_) => 0,
        Expr::Constante(_) => 1,
        Expr::Appel(_, _) => 2,
        Expr::BinOp(_, _, _) => 3,
        Expr::Unaire(_, _) => 4,
    }
}

pub fn cmp_expr(a: &Expr, b: &Expr) -> Ordering {
    use Expr::*;

    rang(a).cmp(&rang(b)).then_with(|| match (a, b) {
        (Nombre(x), Nombre(y)) => x.comparer(y),
        (Constante(x), Constante(y)) => x.cmp(y),
        (Appel(f, xs), Appel(g, ys)) => f
            .cmp(g)
            .then(xs.len().cmp(&ys.len()))
            .then_with(|| cmp_listes(xs, ys)),
        (BinOp(o1, a1, b1), BinOp(o2, a2, b2)) => o1
            .cmp(o2)
            .then_with(|| cmp_expr(a1, a2))
            .then_with(|| cmp_expr(b1, b2)),
        (Unaire(o1, x1), Unaire(o2, x2)) => o1.cmp(o2).then_with(|| cmp_expr(x1, x2)),
        // rangs égaux => même variante
        _ => Ordering::Equal,
    })
}

fn cmp_listes(xs: &[Expr], ys: &[Expr]) -> Ordering {
    xs.iter()
        .zip(ys)
        .map(|(x, y)| cmp_expr(x, y))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Opérandes dans l'ordre canonique (échange seulement pour + et *).
pub fn ordonner(op: OpBinaire, a: Expr, b: Expr) -> (Expr, Expr) {
    if op.est_commutatif() && cmp_expr(&a, &b) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    }
}

/* ------------------------ entiers ------------------------ */

/// floor(√x) par Newton ; 0 pour x <= 0.
pub fn racine_entiere(x: &BigInt) -> BigInt {
    if !x.is_positive() {
        return BigInt::zero();
    }

    let mut y = BigInt::one() << x.bits().div_ceil(2);
    loop {
        let y_next = (&y + (x / &y)) >> 1;
        if y_next >= y {
            let mut z = y_next;
            while (&z + 1u32) * (&z + 1u32) <= *x {
                z += 1u32;
            }
            while &z * &z > *x {
                z -= 1u32;
            }
            return z;
        }
        y = y_next;
    }
}

/// n = s² · reste, s maximal. Renvoie (s, reste). Pour n <= 0 : (1, n).
/// - n tient dans un u64 : factorisation exacte (division d'essai jusqu'à ∛reste)
/// - au-delà : division d'essai bornée par DIVISEUR_ESSAI_MAX
pub fn extrait_carre_parfait(n: &BigInt) -> (BigInt, BigInt) {
    if !n.is_positive() {
        return (BigInt::one(), n.clone());
    }
    if let Some(m) = n.to_u64() {
        let (s, reste) = extrait_carre_u64(m);
        return (BigInt::from(s), BigInt::from(reste));
    }

    let mut reste = n.clone();
    let mut s = BigInt::one();

    let mut p = BigInt::from(2);
    let borne = BigInt::from(DIVISEUR_ESSAI_MAX);
    while &p * &p <= reste && p <= borne {
        let p2 = &p * &p;

        while (&reste % &p2).is_zero() {
            reste /= &p2;
            s *= &p;
        }

        if p == BigInt::from(2) {
            p = BigInt::from(3);
        } else {
            p += 2;
        }
    }

    // reste carré d'un grand facteur
    let r = racine_entiere(&reste);
    if !reste.is_one() && &r * &r == reste {
        s *= r;
        reste = BigInt::one();
    }

    (s, reste)
}

/// Tous les premiers p avec p³ <= reste sont retirés : ce qui reste est 1, q, q·q' ou q².
/// Seul q² est encore un carré, d'où le test final.
fn extrait_carre_u64(n: u64) -> (u64, u64) {
    let mut reste = n;
    let mut s = 1u64;
    let mut libre = 1u64;

    let mut p = 2u64;
    while u128::from(p).pow(3) <= u128::from(reste) {
        if reste % p == 0 {
            let mut e = 0u32;
            while reste % p == 0 {
                reste /= p;
                e += 1;
            }
            s *= p.pow(e / 2);
            if e % 2 == 1 {
                libre *= p;
            }
        }
        p = if p == 2 { 3 } else { p + 2 };
    }

    let r = racine_entiere(&BigInt::from(reste)).to_u64().unwrap_or(0);
    if reste > 1 && r.checked_mul(r) == Some(reste) {
        s *= r;
    } else {
        libre *= reste;
    }
    (s, libre)
}
