// src/noyau/precision.rs
//
// Contexte de calcul : précision, arrondi, mode strict, limite de profondeur du parseur,
// cache des constantes et dernière erreur consignée.
// Aucun état global : le contexte est passé explicitement à chaque étape.

use std::collections::HashMap;

use astro_float::{BigFloat, Consts, Radix, RoundingMode};

use super::constantes;
use super::erreur::Erreur;
use super::registre::Constante;

pub const PRECISION_MIN: usize = 2;
pub const PRECISION_MAX: usize = 8192;
pub const PRECISION_DEFAUT: usize = 256;

/// Bits de garde ajoutés à chaque opération avant l'arrondi final.
pub const BITS_DE_GARDE: usize = 128;

pub const PROFONDEUR_MAX_DEFAUT: usize = 100;

pub struct Contexte {
    precision: usize,
    arrondi: RoundingMode,
    strict: bool,
    profondeur_max: usize,
    // valeurs à la précision de travail (precision + BITS_DE_GARDE)
    cache: HashMap<Constante, BigFloat>,
    consts: Consts,
    derniere_erreur: Option<Erreur>,
}

impl Contexte {
    pub fn new() -> Result<Self, Erreur> {
        Ok(Self {
            precision: PRECISION_DEFAUT,
            arrondi: RoundingMode::ToEven,
            strict: false,
            profondeur_max: PROFONDEUR_MAX_DEFAUT,
            cache: HashMap::new(),
            consts: Consts::new()?,
            derniere_erreur: None,
        })
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn precision_travail(&self) -> usize {
        self.precision + BITS_DE_GARDE
    }

    /// Borne dans [PRECISION_MIN, PRECISION_MAX] ; tout changement vide le cache.
    /// Retourne la précision effectivement retenue.
    pub fn set_precision(&mut self, bits: usize) -> usize {
        let p = bits.clamp(PRECISION_MIN, PRECISION_MAX);
        if p != bits {
            log::warn!("précision {bits} hors bornes, ramenée à {p}");
        }
        if p != self.precision {
            log::info!("précision: {} -> {p} bits", self.precision);
            self.precision = p;
            self.vider_cache();
        }
        p
    }

    /// Chiffres décimaux significatifs correspondant à la précision binaire.
    pub fn chiffres_decimaux(&self) -> usize {
        (self.precision as f64 * std::f64::consts::LOG10_2).floor() as usize
    }

    pub fn arrondi(&self) -> RoundingMode {
        self.arrondi
    }

    pub fn set_arrondi(&mut self, rm: RoundingMode) {
        if rm != self.arrondi {
            self.arrondi = rm;
            self.vider_cache();
        }
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Strict : une erreur de domaine donne NaN au lieu de 0.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn profondeur_max(&self) -> usize {
        self.profondeur_max
    }

    pub fn set_profondeur_max(&mut self, n: usize) {
        self.profondeur_max = n.max(1);
    }

    /* ------------------------ constantes ------------------------ */

    /// Valeur à la précision de travail, calculée au premier usage puis servie par le cache.
    pub fn constante(&mut self, c: Constante) -> Result<BigFloat, Erreur> {
        if let Some(v) = self.cache.get(&c) {
            log::trace!("cache: {}", c.nom());
            return Ok(v.clone());
        }
        let p = self.precision_travail();
        log::trace!("calcul de {} à {p} bits", c.nom());
        let v = constantes::calcule(c, p, self.arrondi, &mut self.consts)?;
        self.cache.insert(c, v.clone());
        Ok(v)
    }

    pub fn est_en_cache(&self, c: Constante) -> bool {
        self.cache.contains_key(&c)
    }

    pub fn vider_cache(&mut self) {
        self.cache.clear();
    }

    pub(crate) fn consts(&mut self) -> &mut Consts {
        &mut self.consts
    }

    /// Littéral décimal -> valeur à la précision courante.
    /// Un exposant hors de la plage de BigFloat sature (inf ou 0) et est consigné.
    pub(crate) fn lire_litteral(&mut self, texte: &str) -> BigFloat {
        let normalise = normalise_litteral(texte);
        let v = BigFloat::parse(
            &normalise,
            Radix::Dec,
            self.precision,
            self.arrondi,
            &mut self.consts,
        );
        if v.is_inf() || v.is_nan() || (v.is_zero() && mantisse_non_nulle(&normalise)) {
            self.consigner(Erreur::LitteralHorsBornes(texte.to_string()));
        }
        v
    }

    /* ------------------------ erreurs ------------------------ */

    pub fn consigner(&mut self, e: Erreur) {
        log::warn!("{e}");
        self.derniere_erreur = Some(e);
    }

    pub fn derniere_erreur(&self) -> Option<&Erreur> {
        self.derniere_erreur.as_ref()
    }

    pub fn effacer_erreur(&mut self) -> Option<Erreur> {
        self.derniere_erreur.take()
    }

    /// Consigne l'erreur et rend la valeur de repli : 0, ou NaN en mode strict.
    pub(crate) fn degrader(&mut self, e: Erreur) -> BigFloat {
        self.consigner(e);
        if self.strict {
            BigFloat::nan(None)
        } else {
            BigFloat::from_i32(0, self.precision_travail())
        }
    }
}

pub(crate) fn arrondir(mut x: BigFloat, p: usize, rm: RoundingMode) -> Result<BigFloat, Erreur> {
    x.set_precision(p, rm)?;
    Ok(x)
}

/// "3." -> "3.0", ".5" -> "0.5", "2E+4" -> "2e4"
fn normalise_litteral(texte: &str) -> String {
    let mut s = String::with_capacity(texte.len() + 2);
    let mut prec: Option<char> = None;
    let chars: Vec<char> = texte.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '.' => {
                if !prec.is_some_and(|p| p.is_ascii_digit()) {
                    s.push('0');
                }
                s.push('.');
                if !chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()) {
                    s.push('0');
                }
            }
            'E' => s.push('e'),
            '+' => {}
            _ => s.push(c),
        }
        prec = Some(c);
    }
    s
}

fn mantisse_non_nulle(normalise: &str) -> bool {
    normalise
        .split('e')
        .next()
        .is_some_and(|m| m.chars().any(|c| matches!(c, '1'..='9')))
}
