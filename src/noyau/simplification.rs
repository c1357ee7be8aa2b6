// src/noyau/simplification.rs
//
// Simplification symbolique en une passe ascendante :
// - enfants d'abord, puis au plus une règle au nœud (la première qui s'applique)
// - toute réécriture reconstruit ses nœuds via `binop` / `unaire` / `speciales::fonction`,
//   donc le résultat est déjà sous forme normale (simplifier deux fois ne change rien)
// - pas de boucle de point fixe : une réduction qui demande plusieurs tours croisés reste partielle
//
// L'arbre d'entrée n'est jamais modifié.

use num_traits::Zero;

use super::canon::ordonner;
use super::erreur::Erreur;
use super::expr::{Expr, OpBinaire, OpUnaire};
use super::precision::Contexte;
use super::registre::Fonction;
use super::speciales;

pub fn simplifier(e: &Expr, ctx: &mut Contexte) -> Expr {
    match e {
        Expr::Nombre(_) | Expr::Constante(_) => e.clone(),
        Expr::Unaire(op, x) => {
            let x = simplifier(x, ctx);
            unaire(*op, x)
        }
        Expr::BinOp(op, a, b) => {
            let a = simplifier(a, ctx);
            let b = simplifier(b, ctx);
            binop(*op, a, b, ctx)
        }
        Expr::Appel(f, args) => {
            let args = args.iter().map(|a| simplifier(a, ctx)).collect();
            speciales::fonction(*f, args, ctx)
        }
    }
}

/// +x -> x, -(-x) -> x
pub(crate) fn unaire(op: OpUnaire, x: Expr) -> Expr {
    match (op, x) {
        (OpUnaire::Plus, x) => x,
        (OpUnaire::Moins, Expr::Unaire(OpUnaire::Moins, y)) => *y,
        (op, x) => Expr::unaire(op, x),
    }
}

/// Nœud binaire dont les opérandes sont déjà simplifiés.
pub(crate) fn binop(op: OpBinaire, a: Expr, b: Expr, ctx: &mut Contexte) -> Expr {
    let (a, b) = ordonner(op, a, b);
    match op {
        OpBinaire::Plus => plus(a, b, ctx),
        OpBinaire::Moins => moins(a, b, ctx),
        OpBinaire::Fois => fois(a, b, ctx),
        OpBinaire::Divise => divise(a, b, ctx),
        OpBinaire::Puissance => puissance(a, b, ctx),
        _ => Expr::binop(op, a, b),
    }
}

/* ------------------------ utilitaires ------------------------ */

/// p = c·x ou x·c  =>  Some(c)
fn coefficient_de(p: &Expr, x: &Expr) -> Option<Expr> {
    match p {
        Expr::BinOp(OpBinaire::Fois, u, v) if **v == *x => Some((**u).clone()),
        Expr::BinOp(OpBinaire::Fois, u, v) if **u == *x => Some((**v).clone()),
        _ => None,
    }
}

fn facteurs(e: &Expr) -> Option<(&Expr, &Expr)> {
    match e {
        Expr::BinOp(OpBinaire::Fois, u, v) => Some((u, v)),
        _ => None,
    }
}

fn racine_de(e: &Expr) -> Option<&Expr> {
    match e {
        Expr::Appel(Fonction::Sqrt, args) => args.first(),
        _ => None,
    }
}

/* ------------------------ règles ------------------------ */

fn plus(a: Expr, b: Expr, ctx: &mut Contexte) -> Expr {
    if b.est_zero() {
        return a;
    }
    if a.est_zero() {
        return b;
    }
    if let (Some(x), Some(y)) = (a.comme_entier(), b.comme_entier()) {
        let s = x + y;
        return Expr::entier(s, ctx);
    }

    // termes semblables
    if a == b {
        let deux = Expr::entier(2, ctx);
        return binop(OpBinaire::Fois, deux, a, ctx);
    }
    if let Some(c) = coefficient_de(&a, &b) {
        let un = Expr::entier(1, ctx);
        let c = binop(OpBinaire::Plus, c, un, ctx);
        return binop(OpBinaire::Fois, c, b, ctx);
    }
    if let Some(c) = coefficient_de(&b, &a) {
        let un = Expr::entier(1, ctx);
        let c = binop(OpBinaire::Plus, un, c, ctx);
        return binop(OpBinaire::Fois, c, a, ctx);
    }
    if let (Some((u1, v1)), Some((u2, v2))) = (facteurs(&a), facteurs(&b)) {
        let commun = if v1 == v2 {
            Some((u1, u2, v1))
        } else if u1 == u2 {
            Some((v1, v2, u1))
        } else if u1 == v2 {
            Some((v1, u2, u1))
        } else if v1 == u2 {
            Some((u1, v2, v1))
        } else {
            None
        };
        if let Some((c1, c2, x)) = commun {
            let (c1, c2, x) = (c1.clone(), c2.clone(), x.clone());
            let c = binop(OpBinaire::Plus, c1, c2, ctx);
            return binop(OpBinaire::Fois, c, x, ctx);
        }
    }

    Expr::binop(OpBinaire::Plus, a, b)
}

fn moins(a: Expr, b: Expr, ctx: &mut Contexte) -> Expr {
    if b.est_zero() {
        return a;
    }
    if a == b {
        return Expr::entier(0, ctx);
    }
    Expr::binop(OpBinaire::Moins, a, b)
}

fn fois(a: Expr, b: Expr, ctx: &mut Contexte) -> Expr {
    if a.est_zero() || b.est_zero() {
        return Expr::entier(0, ctx);
    }
    if a.est_un() {
        return b;
    }
    if b.est_un() {
        return a;
    }
    if let (Some(x), Some(y)) = (a.comme_entier(), b.comme_entier()) {
        let p = x * y;
        return Expr::entier(p, ctx);
    }
    // √u·√v -> √(u·v)
    if let (Some(u), Some(v)) = (racine_de(&a), racine_de(&b)) {
        let (u, v) = (u.clone(), v.clone());
        let produit = binop(OpBinaire::Fois, u, v, ctx);
        return speciales::fonction(Fonction::Sqrt, vec![produit], ctx);
    }
    Expr::binop(OpBinaire::Fois, a, b)
}

fn divise(a: Expr, b: Expr, ctx: &mut Contexte) -> Expr {
    if b.est_zero() {
        ctx.consigner(Erreur::DivisionParZero);
        return Expr::entier(0, ctx);
    }
    if b.est_un() {
        return a;
    }
    if a == b {
        return Expr::entier(1, ctx);
    }
    if a.est_zero() {
        return Expr::entier(0, ctx);
    }

    // (c·b)/b -> c
    if let Some(c) = coefficient_de(&a, &b) {
        return c;
    }
    // a/(c·a) -> 1/c
    if let Some(c) = coefficient_de(&b, &a) {
        let un = Expr::entier(1, ctx);
        return binop(OpBinaire::Divise, un, c, ctx);
    }

    // (u±v)/b -> u/b ± v/b
    if let Expr::BinOp(op @ (OpBinaire::Plus | OpBinaire::Moins), u, v) = &a {
        let gauche = binop(OpBinaire::Divise, (**u).clone(), b.clone(), ctx);
        let droite = binop(OpBinaire::Divise, (**v).clone(), b, ctx);
        return binop(*op, gauche, droite, ctx);
    }

    if let (Some(x), Some(y)) = (a.comme_entier(), b.comme_entier()) {
        if (x % y).is_zero() {
            let q = x / y;
            return Expr::entier(q, ctx);
        }
    }

    // a/√v -> (a·√v)/v
    if let Some(v) = racine_de(&b) {
        let v = v.clone();
        let num = binop(OpBinaire::Fois, a, b, ctx);
        return binop(OpBinaire::Divise, num, v, ctx);
    }

    Expr::binop(OpBinaire::Divise, a, b)
}

fn puissance(a: Expr, b: Expr, ctx: &mut Contexte) -> Expr {
    if b.est_zero() {
        return Expr::entier(1, ctx);
    }
    if b.est_un() {
        return a;
    }
    if a.est_zero() {
        return Expr::entier(0, ctx);
    }
    if a.est_un() {
        return Expr::entier(1, ctx);
    }
    Expr::binop(OpBinaire::Puissance, a, b)
}
