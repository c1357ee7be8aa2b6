// src/noyau/lecture.rs
//
// Évaluation numérique d'un arbre.
// - chaque opération/fonction travaille à precision + BITS_DE_GARDE ; le pipeline arrondit la racine
// - erreurs de domaine / division par zéro : consignées dans le Contexte, valeur de repli, on continue
// - résultat de fonction sous 2^-(precision+10) : ramené à 0 exact (sin(pi), cos(pi/2)…)

use std::cmp::Ordering;

use astro_float::BigFloat;

use super::erreur::Erreur;
use super::expr::{Expr, OpBinaire, OpUnaire};
use super::precision::Contexte;
use super::registre::{self, Constante, FonctionBinaire, FonctionUnaire, Forme};

/// Bits sous la précision demandée en dessous desquels un résultat de fonction vaut 0.
const SEUIL_ZERO: usize = 10;

/// Valeur de `e` à la précision de travail ; l'arbre n'est jamais modifié.
pub fn evaluer(e: &Expr, ctx: &mut Contexte) -> BigFloat {
    match e {
        Expr::Nombre(n) => n.valeur.clone(),

        Expr::Constante(nom) => match registre::constante_par_nom(nom) {
            Some(c) => constante(c, ctx),
            None => ctx.degrader(Erreur::SymboleLibre(nom.clone())),
        },

        Expr::Unaire(op, x) => {
            let v = evaluer(x, ctx);
            match op {
                OpUnaire::Plus => v,
                OpUnaire::Moins => v.neg(),
            }
        }

        Expr::BinOp(op, a, b) => {
            let va = evaluer(a, ctx);
            let vb = evaluer(b, ctx);
            binaire(*op, &va, &vb, ctx)
        }

        Expr::Appel(f, args) => {
            let vals: Vec<BigFloat> = args.iter().map(|a| evaluer(a, ctx)).collect();
            let r = match (f.forme(), vals.as_slice()) {
                (Forme::Une(g), [x]) => fonction(f.nom(), g, x, ctx),
                (Forme::Deux(FonctionBinaire::Atan2), [y, x]) => atan2(y, x, ctx),
                (Forme::Deux(FonctionBinaire::Pow), [b, x]) => puissance(b, x, ctx),
                // arbre construit à la main (le parseur vérifie l'arité)
                (_, vals) => ctx.degrader(Erreur::Interne(format!(
                    "{}: {} argument(s) au lieu de {}",
                    f.nom(),
                    vals.len(),
                    f.arite()
                ))),
            };
            accrocher_zero(r, ctx)
        }
    }
}

fn constante(c: Constante, ctx: &mut Contexte) -> BigFloat {
    match ctx.constante(c) {
        Ok(v) => v,
        Err(e) => ctx.degrader(e),
    }
}

fn zero(ctx: &Contexte) -> BigFloat {
    BigFloat::from_i32(0, ctx.precision_travail())
}

fn booleen(b: bool, ctx: &Contexte) -> BigFloat {
    BigFloat::from_i32(i32::from(b), ctx.precision_travail())
}

/// Comparaison totale hors NaN.
fn ordre(a: &BigFloat, b: &BigFloat) -> Option<Ordering> {
    a.cmp(b).map(|s| s.cmp(&0))
}

fn accrocher_zero(r: BigFloat, ctx: &Contexte) -> BigFloat {
    let seuil = -((ctx.precision() + SEUIL_ZERO) as i64);
    match r.exponent() {
        Some(e) if !r.is_zero() && i64::from(e) <= seuil => zero(ctx),
        _ => r,
    }
}

/* ------------------------ opérateurs ------------------------ */

fn binaire(op: OpBinaire, a: &BigFloat, b: &BigFloat, ctx: &mut Contexte) -> BigFloat {
    let p = ctx.precision_travail();
    let rm = ctx.arrondi();

    match op {
        OpBinaire::Plus => a.add(b, p, rm),
        OpBinaire::Moins => a.sub(b, p, rm),
        OpBinaire::Fois => a.mul(b, p, rm),
        OpBinaire::Divise => {
            if b.is_zero() {
                ctx.consigner(Erreur::DivisionParZero);
                return zero(ctx);
            }
            a.div(b, p, rm)
        }
        OpBinaire::Puissance => puissance(a, b, ctx),

        // NaN : toute comparaison est fausse
        OpBinaire::Egal => booleen(ordre(a, b) == Some(Ordering::Equal), ctx),
        OpBinaire::Different => booleen(
            ordre(a, b).is_some_and(|o| o != Ordering::Equal),
            ctx,
        ),
        OpBinaire::Inf => booleen(ordre(a, b) == Some(Ordering::Less), ctx),
        OpBinaire::InfEgal => booleen(
            matches!(ordre(a, b), Some(Ordering::Less | Ordering::Equal)),
            ctx,
        ),
        OpBinaire::Sup => booleen(ordre(a, b) == Some(Ordering::Greater), ctx),
        OpBinaire::SupEgal => booleen(
            matches!(ordre(a, b), Some(Ordering::Greater | Ordering::Equal)),
            ctx,
        ),
    }
}

/// b^x (opérateur ^ et pow) :
/// - base négative : exposant entier exigé, signe selon la parité
/// - 0^x avec x < 0 : division par zéro
fn puissance(b: &BigFloat, x: &BigFloat, ctx: &mut Contexte) -> BigFloat {
    let p = ctx.precision_travail();
    let rm = ctx.arrondi();

    if b.is_nan() || x.is_nan() {
        return BigFloat::nan(None);
    }
    if x.is_zero() {
        return BigFloat::from_i32(1, p);
    }
    if b.is_zero() {
        if x.is_negative() {
            ctx.consigner(Erreur::DivisionParZero);
        }
        return zero(ctx);
    }

    if b.is_negative() {
        if !x.is_int() {
            return ctx.degrader(Erreur::Domaine {
                fonction: "pow",
                contrainte: "un exposant entier pour une base négative",
            });
        }
        let impair = !x.div(&BigFloat::from_i32(2, p), p, rm).is_int();
        let m = b.abs().pow(x, p, rm, ctx.consts());
        return if impair { m.neg() } else { m };
    }

    b.pow(x, p, rm, ctx.consts())
}

fn atan2(y: &BigFloat, x: &BigFloat, ctx: &mut Contexte) -> BigFloat {
    let p = ctx.precision_travail();
    let rm = ctx.arrondi();

    if y.is_nan() || x.is_nan() {
        return BigFloat::nan(None);
    }

    let pi = constante(Constante::Pi, ctx);

    if x.is_zero() {
        let demi_pi = pi.div(&BigFloat::from_i32(2, p), p, rm);
        return if y.is_zero() {
            zero(ctx)
        } else if y.is_negative() {
            demi_pi.neg()
        } else {
            demi_pi
        };
    }

    let base = y.div(x, p, rm).atan(p, rm, ctx.consts());
    if x.is_positive() {
        base
    } else if y.is_negative() {
        base.sub(&pi, p, rm)
    } else {
        base.add(&pi, p, rm)
    }
}

/* ------------------------ fonctions à un argument ------------------------ */

fn contrainte_de_domaine(f: FonctionUnaire, x: &BigFloat, p: usize) -> Option<&'static str> {
    let un = BigFloat::from_i32(1, p);
    let zero = BigFloat::from_i32(0, p);
    let abs_vs_un = ordre(&x.abs(), &un);
    let vs_un = ordre(x, &un);
    let vs_zero = ordre(x, &zero);

    match f {
        FonctionUnaire::Asin | FonctionUnaire::Acos if abs_vs_un == Some(Ordering::Greater) => {
            Some("un argument dans [-1, 1]")
        }
        FonctionUnaire::Acosh if vs_un == Some(Ordering::Less) => Some("un argument >= 1"),
        FonctionUnaire::Atanh if abs_vs_un != Some(Ordering::Less) => {
            Some("un argument dans ]-1, 1[")
        }
        FonctionUnaire::Sqrt if vs_zero == Some(Ordering::Less) => Some("un argument >= 0"),
        FonctionUnaire::Log | FonctionUnaire::Log10 if vs_zero != Some(Ordering::Greater) => {
            Some("un argument > 0")
        }
        _ => None,
    }
}

fn fonction(nom: &'static str, f: FonctionUnaire, x: &BigFloat, ctx: &mut Contexte) -> BigFloat {
    let p = ctx.precision_travail();
    let rm = ctx.arrondi();

    if x.is_nan() {
        return x.clone();
    }

    if let Some(contrainte) = contrainte_de_domaine(f, x, p) {
        return ctx.degrader(Erreur::Domaine {
            fonction: nom,
            contrainte,
        });
    }

    let cc = ctx.consts();
    match f {
        FonctionUnaire::Sin => x.sin(p, rm, cc),
        FonctionUnaire::Cos => x.cos(p, rm, cc),
        FonctionUnaire::Tan => x.tan(p, rm, cc),
        FonctionUnaire::Asin => x.asin(p, rm, cc),
        FonctionUnaire::Acos => x.acos(p, rm, cc),
        FonctionUnaire::Atan => x.atan(p, rm, cc),
        FonctionUnaire::Sinh => x.sinh(p, rm, cc),
        FonctionUnaire::Cosh => x.cosh(p, rm, cc),
        FonctionUnaire::Tanh => x.tanh(p, rm, cc),
        FonctionUnaire::Asinh => x.asinh(p, rm, cc),
        FonctionUnaire::Acosh => x.acosh(p, rm, cc),
        FonctionUnaire::Atanh => x.atanh(p, rm, cc),
        FonctionUnaire::Sqrt => x.sqrt(p, rm),
        FonctionUnaire::Log => x.ln(p, rm, cc),
        FonctionUnaire::Log10 => {
            let ln10 = BigFloat::from_i32(10, p).ln(p, rm, cc);
            x.ln(p, rm, cc).div(&ln10, p, rm)
        }
        FonctionUnaire::Exp => x.exp(p, rm, cc),
        FonctionUnaire::Abs => x.abs(),
        FonctionUnaire::Floor => x.floor(),
        FonctionUnaire::Ceil => x.ceil(),
    }
}
