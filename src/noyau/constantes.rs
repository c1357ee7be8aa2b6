// src/noyau/constantes.rs
//
// Calcul des constantes nommées à une précision donnée.
// π et e viennent du cache interne d'astro-float ; ln2, ln10, √2 par les fonctions usuelles ;
// γ (Euler–Mascheroni) par la série de Brent–McMillan.

use astro_float::{BigFloat, Consts, RoundingMode};

use super::erreur::Erreur;
use super::precision::arrondir;
use super::registre::Constante;

/// Bits supplémentaires pour le calcul avant l'arrondi final.
const MARGE: usize = 64;

pub fn calcule(
    c: Constante,
    p: usize,
    rm: RoundingMode,
    cc: &mut Consts,
) -> Result<BigFloat, Erreur> {
    let pw = p + MARGE;
    let v = match c {
        Constante::Pi => cc.pi(pw, rm),
        Constante::E => cc.e(pw, rm),
        Constante::Ln2 => BigFloat::from_i32(2, pw).ln(pw, rm, cc),
        Constante::Ln10 => BigFloat::from_i32(10, pw).ln(pw, rm, cc),
        Constante::Sqrt2 => BigFloat::from_i32(2, pw).sqrt(pw, rm),
        Constante::Gamma => gamma(pw, rm, cc),
    };
    arrondir(v, p, rm)
}

/// Brent–McMillan (variante B1) :
///   A₀ = -ln n, B₀ = 1, U₀ = A₀, V₀ = 1
///   Bₖ = Bₖ₋₁·n²/k², Aₖ = (Aₖ₋₁·n²/k + Bₖ)/k, U += Aₖ, V += Bₖ
///   γ ≈ U/V, erreur en O(e^(-4n)).
///
/// Les termes montent jusqu'à ~e^(2n) avant de décroître : d'où p/2 bits de travail en plus.
fn gamma(p: usize, rm: RoundingMode, cc: &mut Consts) -> BigFloat {
    let pw = p + p / 2 + MARGE;

    let n = (p as f64 * std::f64::consts::LN_2 / 4.0).ceil() as i64 + 1;
    // α ≈ 3.5911 résout α(ln α - 1) = 1 : au-delà de α·n les termes sont négligeables
    let k_max = (n as f64 * 3.6).ceil() as i64 + 1;

    log::trace!("gamma: p={p} n={n} k_max={k_max}");

    let n2 = BigFloat::from_i64(n * n, pw);
    let mut a = BigFloat::from_i64(n, pw).ln(pw, rm, cc).neg();
    let mut b = BigFloat::from_i32(1, pw);
    let mut u = a.clone();
    let mut v = b.clone();

    for k in 1..=k_max {
        let kb = BigFloat::from_i64(k, pw);
        let k2 = BigFloat::from_i64(k * k, pw);

        b = b.mul(&n2, pw, rm).div(&k2, pw, rm);
        a = a
            .mul(&n2, pw, rm)
            .div(&kb, pw, rm)
            .add(&b, pw, rm)
            .div(&kb, pw, rm);

        u = u.add(&a, pw, rm);
        v = v.add(&b, pw, rm);
    }

    u.div(&v, pw, rm)
}
