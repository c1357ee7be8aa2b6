//! Noyau : pipeline
//!
//! texte -> jetons -> arbre -> { évaluation numérique | simplification symbolique }
//!
//! Les erreurs lexicales / de syntaxe sont le cas `Err` (aucun résultat).
//! Les erreurs d'évaluation (domaine, division par zéro) sont consignées : le résultat existe
//! et porte la dernière erreur rencontrée.

use astro_float::BigFloat;

use super::analyse::{parse, parse_avec_symboles};
use super::erreur::Erreur;
use super::expr::Expr;
use super::jetons::{format_jetons, tokenize};
use super::lecture::evaluer;
use super::precision::{arrondir, Contexte};
use super::registre::Fonction;
use super::simplification::simplifier;

/// Trace des étapes (debug / affichage de la démarche par l'appelant).
#[derive(Default, Clone, Debug)]
pub struct Demarche {
    pub jetons: String,
    pub avant: String,
    pub apres: String,
}

#[derive(Clone, Debug)]
pub struct Evaluation {
    pub valeur: BigFloat,
    /// Arbre d'entiers (opérations entières seulement) ET valeur entière.
    pub est_entier: bool,
    pub erreur: Option<Erreur>,
    pub demarche: Demarche,
}

#[derive(Clone, Debug)]
pub struct Simplification {
    pub expr: Expr,
    pub erreur: Option<Erreur>,
    pub demarche: Demarche,
}

/// Évalue `texte` à `precision_bits` (bornée), calcul interne avec bits de garde,
/// un seul arrondi final.
pub fn parse_and_evaluate(
    texte: &str,
    precision_bits: usize,
    ctx: &mut Contexte,
) -> Result<Evaluation, Erreur> {
    ctx.effacer_erreur();
    let p = ctx.set_precision(precision_bits);

    let jetons = format_jetons(&tokenize(texte));
    log::debug!("jetons: {jetons}");

    let arbre = parse(texte, ctx)?;
    log::debug!("arbre: {arbre}");

    let brute = evaluer(&arbre, ctx);
    let valeur = match arrondir(brute.clone(), p, ctx.arrondi()) {
        Ok(v) => v,
        Err(e) => {
            ctx.consigner(e);
            brute
        }
    };

    let est_entier = arithmetique_entiere(&arbre) && valeur.is_int();

    Ok(Evaluation {
        valeur,
        est_entier,
        erreur: ctx.derniere_erreur().cloned(),
        demarche: Demarche {
            jetons,
            avant: arbre.to_string(),
            apres: String::new(),
        },
    })
}

/// Simplifie `texte` ; les identifiants inconnus sont des symboles libres.
pub fn parse_and_simplify(texte: &str, ctx: &mut Contexte) -> Result<Simplification, Erreur> {
    ctx.effacer_erreur();

    let jetons = format_jetons(&tokenize(texte));
    let arbre = parse_avec_symboles(texte, ctx)?;
    let expr = simplifier(&arbre, ctx);
    log::debug!("simplification: {arbre} -> {expr}");

    Ok(Simplification {
        demarche: Demarche {
            jetons,
            avant: arbre.to_string(),
            apres: expr.to_string(),
        },
        expr,
        erreur: ctx.derniere_erreur().cloned(),
    })
}

/// Borne dans [2, 8192] et invalide le cache des constantes si la précision change.
pub fn set_precision(ctx: &mut Contexte, bits: usize) -> usize {
    ctx.set_precision(bits)
}

/// Littéraux entiers et opérations qui restent dans les entiers.
fn arithmetique_entiere(e: &Expr) -> bool {
    match e {
        Expr::Nombre(n) => n.est_entier(),
        Expr::Constante(_) => false,
        Expr::Unaire(_, x) => arithmetique_entiere(x),
        Expr::BinOp(_, a, b) => arithmetique_entiere(a) && arithmetique_entiere(b),
        Expr::Appel(Fonction::Floor | Fonction::Ceil, _) => true,
        Expr::Appel(Fonction::Abs | Fonction::Pow, args) => args.iter().all(arithmetique_entiere),
        Expr::Appel(_, _) => false,
    }
}
