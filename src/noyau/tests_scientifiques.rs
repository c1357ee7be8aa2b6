//! Tests scientifiques (campagne) : scénarios + propriétés + limites contrôlées.
//!
//! But : vérifier le pipeline de bout en bout sans faire chauffer la machine.
//! - budget temps global
//! - profondeurs bornées (la garde du parseur compte six niveaux par parenthèse)
//! - précisions variées (2, 53, 256, 1024 bits)
//!
//! Notes :
//! - les valeurs numériques sont comparées par l'exposant de l'écart (|a-b| < 2^-k)
//! - la simplification est en une passe : on ne teste que des réductions atteignables en un tour

use std::time::{Duration, Instant};

use astro_float::{BigFloat, Radix, RoundingMode};

use super::erreur::{Erreur, ErreurSyntaxe};
use super::expr::Expr;
use super::precision::Contexte;
use super::registre::Constante;
use super::{parse_and_evaluate, parse_and_simplify};

fn ctx() -> Contexte {
    Contexte::new().unwrap_or_else(|e| panic!("contexte: {e}"))
}

fn eval_ok(expr: &str, bits: usize, ctx: &mut Contexte) -> BigFloat {
    parse_and_evaluate(expr, bits, ctx)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
        .valeur
}

fn simp_ok(expr: &str, ctx: &mut Contexte) -> Expr {
    parse_and_simplify(expr, ctx)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
        .expr
}

/// |v - attendu| < 2^-bits
fn assert_proche(v: &BigFloat, attendu: &str, bits: i32) {
    let mut c = ctx();
    let a = BigFloat::parse(attendu, Radix::Dec, 1024, RoundingMode::ToEven, c.consts());
    let d = v.sub(&a, 1024, RoundingMode::ToEven);
    assert!(
        d.is_zero() || d.exponent().is_some_and(|e| e <= -bits),
        "valeur={v} attendu={attendu}"
    );
}

fn assert_exact(expr: &str, attendu: i32) {
    let v = eval_ok(expr, 256, &mut ctx());
    assert_eq!(
        v.cmp(&BigFloat::from_i32(attendu, 64)),
        Some(0),
        "expr={expr:?} valeur={v}"
    );
}

/// Budget global anti-gel (scientifique + safe).
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Scénarios ------------------------ */

#[test]
fn sci_scenarios_de_reference() {
    let mut c = ctx();
    let ev = parse_and_evaluate("2+3*4", 256, &mut c).unwrap();
    assert!(ev.est_entier);
    assert!(ev.erreur.is_none());

    assert_exact("2+3*4", 14);
    assert_exact("2^3^2", 512);
    assert_exact("2(3+4)", 14);
    assert_exact("sin(pi/2)", 1);
}

#[test]
fn sci_multiplication_implicite() {
    let mut c = ctx();
    let pi = "3.14159265358979323846264338327950288419716939937510582097494459";
    let e = "2.71828182845904523536028747135266249775724709369995957496696763";

    let v = eval_ok("2pi", 256, &mut c);
    let deux_pi = eval_ok("2*pi", 256, &mut c);
    assert_eq!(v.cmp(&deux_pi), Some(0));
    assert_proche(
        &eval_ok("pi(2)", 256, &mut c),
        "6.28318530717958647692528676655900576839433879875021164194988918",
        190,
    );
    assert_proche(&eval_ok("3e", 256, &mut c), "8.15484548537713570608086241405798749327174128109987872490090289", 190);
    assert_proche(&eval_ok("pi", 256, &mut c), pi, 195);
    assert_proche(&eval_ok("e", 256, &mut c), e, 195);

    assert_exact("(2)(3)(4)", 24);
    assert_exact("2sin(0)", 0);
    assert_exact("2 3 4", 24);
}

#[test]
fn sci_signes_enchaines() {
    assert_exact("2++3", 5);
    assert_exact("2--3", 5);
    assert_exact("--3", 3);
    assert_exact("-+-3", 3);
    assert_exact("2-(-(-3))", -1);
}

#[test]
fn sci_fonctions_et_constantes() {
    let mut c = ctx();
    assert_exact("floor(-2.3)", -3);
    assert_exact("ceil(-2.8)", -2);
    assert_exact("abs(-5)+abs(5)", 10);

    assert_proche(&eval_ok("pow(4,0.5)", 256, &mut c), "2", 250);
    assert_proche(&eval_ok("log10(100)", 256, &mut c), "2", 250);
    assert_proche(&eval_ok("sqrt(pow(3,2)+pow(4,2))", 256, &mut c), "5", 250);
    assert_proche(
        &eval_ok("atan2(1,1)", 256, &mut c),
        "0.785398163397448309615660845819875721049292349843776455243736148",
        200,
    );
    assert_proche(
        &eval_ok("(1+2)*(3+4)/(5+6)", 256, &mut c),
        "1.90909090909090909090909090909090909090909090909090909090909090909",
        200,
    );
    assert_proche(
        &eval_ok("ln2+ln10-log(20)", 256, &mut c),
        "0",
        240,
    );
    assert_proche(&eval_ok("sqrt2^2", 256, &mut c), "2", 250);
    assert_proche(
        &eval_ok("GAMMA", 256, &mut c),
        "0.57721566490153286060651209008240243104215933593992359880576723",
        200,
    );
    assert_proche(
        &eval_ok("sinh(1)+cosh(1)-exp(1)", 256, &mut c),
        "0",
        240,
    );
    assert_proche(&eval_ok("tanh(atanh(0.5))", 256, &mut c), "0.5", 250);
    assert_proche(&eval_ok("asinh(sinh(2))", 256, &mut c), "2", 248);
    assert_proche(&eval_ok("acosh(cosh(3))", 256, &mut c), "3", 245);
    assert_proche(&eval_ok("arcsin(1)*2", 256, &mut c), "3.14159265358979323846264338327950288419716939937510582097494459", 195);
}

#[test]
fn sci_comparaisons() {
    assert_exact("1+1==2", 1);
    assert_exact("pi>3", 1);
    assert_exact("pi<3", 0);
    assert_exact("e<=e", 1);
    assert_exact("2!=2", 0);
    assert_exact("(1<2)+(2<3)", 2);
}

/* ------------------------ Erreurs consignées (domaine, division) ------------------------ */

#[test]
fn sci_bornes_de_domaine() {
    let mut c = ctx();
    for expr in ["sqrt(-1)", "log(0)", "log(-1)", "asin(2)", "acosh(0)", "atanh(1)", "1/0"] {
        let ev = parse_and_evaluate(expr, 256, &mut c)
            .unwrap_or_else(|e| panic!("{expr:?} doit être lu: {e}"));
        assert!(ev.erreur.is_some(), "{expr:?} doit consigner une erreur");
        assert!(ev.valeur.is_zero(), "{expr:?} retombe à 0 en mode permissif");
    }
    let ev = parse_and_evaluate("1/0", 256, &mut c).unwrap();
    assert_eq!(ev.erreur, Some(Erreur::DivisionParZero));
}

#[test]
fn sci_erreur_locale_le_reste_continue() {
    let mut c = ctx();
    let ev = parse_and_evaluate("sqrt(-4) + 3*4", 256, &mut c).unwrap();
    assert!(matches!(ev.erreur, Some(Erreur::Domaine { fonction: "sqrt", .. })));
    assert_eq!(ev.valeur.cmp(&BigFloat::from_i32(12, 64)), Some(0));
}

#[test]
fn sci_mode_strict() {
    let mut c = ctx();
    c.set_strict(true);
    let ev = parse_and_evaluate("log(-1) + 1", 256, &mut c).unwrap();
    assert!(ev.valeur.is_nan());
    assert!(ev.erreur.is_some());
    assert!(!ev.est_entier);
}

#[test]
fn sci_entrees_refusees() {
    let mut c = ctx();
    for expr in [
        "(2+3", "2+3)", "sin()", "atan2(1)", "unknown(1)", "", ".", "2+", "*5", "/5", "^5", "2*/3",
        "sin cos", "2 = 3", "1.2.3",
    ] {
        assert!(
            parse_and_evaluate(expr, 256, &mut c).is_err(),
            "{expr:?} doit être refusé"
        );
    }
    assert!(matches!(
        parse_and_evaluate("unknown(1)", 256, &mut c),
        Err(Erreur::Syntaxe(ErreurSyntaxe::IdentifiantInconnu(_)))
    ));
}

/* ------------------------ Propriétés ------------------------ */

#[test]
fn sci_rendu_relu_meme_valeur() {
    let mut c = ctx();
    for expr in [
        "2+3*4",
        "-2^2",
        "2(3+4)pi",
        "sin(1.5e-3)+cos(.25)*atan2(1,-2)",
        "sqrt(2)/3 - -4",
        "floor(-2.5)^3",
        "1/(3+exp(0.1))",
        "2 3 4 == 24",
    ] {
        let arbre = super::analyse::parse(expr, &mut c).unwrap();
        let rendu = arbre.to_string();
        let a = eval_ok(expr, 256, &mut c);
        let b = eval_ok(&rendu, 256, &mut c);
        assert_eq!(a.cmp(&b), Some(0), "expr={expr:?} rendu={rendu:?}");
        assert_eq!(super::analyse::parse(&rendu, &mut c).unwrap(), arbre);
    }
}

#[test]
fn sci_idempotence() {
    let mut c = ctx();
    for expr in [
        "2*y+0",
        "x+x+x",
        "3*x+x",
        "x+x*5",
        "2*x+3*x",
        "(a+b)/c",
        "1/sqrt(2)",
        "6/sqrt(3)",
        "sqrt(2)*sqrt(8)",
        "sqrt(12)*x",
        "(x*y)/y",
        "y/(x*y)",
        "x^1+y^0+0^z+1^w",
        "cos(pi/3)+sin(pi/6)",
        "--x",
        "x-x",
        "x/x",
        "12/4+7/2",
    ] {
        let s1 = simp_ok(expr, &mut c);
        let s2 = super::simplification::simplifier(&s1, &mut c);
        assert_eq!(s1, s2, "expr={expr:?} s1={s1} s2={s2}");
    }
}

#[test]
fn sci_invariance_commutative() {
    let mut c = ctx();
    let paires = [
        ("x", "y"),
        ("2", "pi"),
        ("sin(x)", "x*y"),
        ("sqrt(2)", "-x"),
        ("3.5", "3"),
        ("(a+b)", "(b+a)"),
    ];
    for (a, b) in paires {
        for op in ["+", "*"] {
            let g = simp_ok(&format!("({a}){op}({b})"), &mut c);
            let d = simp_ok(&format!("({b}){op}({a})"), &mut c);
            assert_eq!(g, d, "{a} {op} {b}");
        }
    }
}

#[test]
fn sci_monotonie_precision_pi() {
    let mut c = ctx();
    let precisions = [2usize, 8, 53, 64, 256, 1024];
    for w in precisions.windows(2) {
        let (p1, p2) = (w[0], w[1]);
        let v1 = eval_ok("pi", p1, &mut c);
        let v2 = eval_ok("pi", p2, &mut c);
        let d = v1.sub(&v2, 2048, RoundingMode::ToEven);
        // π ∈ [2, 4) : un demi-ulp à p1 bits vaut 2^(1-p1)
        assert!(
            d.is_zero() || d.exponent().is_some_and(|e| e <= 2 - p1 as i32),
            "p1={p1} p2={p2}"
        );
    }
}

/* ------------------------ Simplification : scénarios ------------------------ */

#[test]
fn sci_simplification_scenarios() {
    let mut c = ctx();
    assert_eq!(simp_ok("2*y+0", &mut c), simp_ok("2*y", &mut c));
    assert_eq!(simp_ok("sqrt(8)", &mut c), simp_ok("2*sqrt(2)", &mut c));

    let rendu = |e: &str, c: &mut Contexte| simp_ok(e, c).to_string();
    assert_eq!(rendu("x+x", &mut c), "(2*x)");
    assert_eq!(rendu("3*x+x", &mut c), "(4*x)");
    assert_eq!(rendu("x+x*5", &mut c), "(6*x)");
    assert_eq!(rendu("2*x+3*x", &mut c), "(5*x)");
    assert_eq!(rendu("x-x", &mut c), "0");
    assert_eq!(rendu("x/x", &mut c), "1");
    assert_eq!(rendu("(x*y)/y", &mut c), "x");
    assert_eq!(rendu("y/(x*y)", &mut c), "(1/x)");
    assert_eq!(rendu("(a+b)/c", &mut c), "((a/c)+(b/c))");
    assert_eq!(rendu("1/sqrt(2)", &mut c), "(sqrt(2)/2)");
    assert_eq!(rendu("sqrt(2)*sqrt(3)", &mut c), "sqrt(6)");
    assert_eq!(rendu("sqrt(6)*sqrt(6)", &mut c), "6");
    assert_eq!(rendu("12/4+7/2", &mut c), "(3+(7/2))");
    assert_eq!(rendu("x^1", &mut c), "x");
    assert_eq!(rendu("x^0", &mut c), "1");
    assert_eq!(rendu("0^x", &mut c), "0");
    assert_eq!(rendu("1^x", &mut c), "1");
    assert_eq!(rendu("x*0", &mut c), "0");
    assert_eq!(rendu("1*x", &mut c), "x");
    assert_eq!(rendu("--x", &mut c), "x");
    assert_eq!(rendu("2+3*4", &mut c), "14");
}

#[test]
fn sci_simplification_une_seule_passe() {
    let mut c = ctx();
    // (x+1)-(x+1) se réduit (égalité structurelle) ; (x+1)-(1+x) aussi (ordre canonique)
    assert!(simp_ok("(x+1)-(1+x)", &mut c).est_zero());
    // x+1-x : il faudrait réassocier, hors d'une passe locale
    assert_eq!(simp_ok("x+1-x", &mut c).to_string(), "((1+x)-x)");
    // 6/√3 : la rationalisation donne (6·√3)/3, la division entière n'est pas retentée
    assert_eq!(simp_ok("6/sqrt(3)", &mut c).to_string(), "((6*sqrt(3))/3)");
    // √8 devient 2·√2 avant le produit : √2·(2·√2) n'est plus un produit de deux racines
    assert_eq!(simp_ok("sqrt(2)*sqrt(8)", &mut c).to_string(), "(sqrt(2)*(2*sqrt(2)))");
}

#[test]
fn sci_simplification_ne_modifie_pas_l_entree() {
    let mut c = ctx();
    let arbre = super::analyse::parse_avec_symboles("x*1+0", &mut c).unwrap();
    let copie = arbre.clone();
    let s = super::simplification::simplifier(&arbre, &mut c);
    assert_eq!(arbre, copie);
    assert_ne!(s, arbre);
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_precisions_extremes() {
    let t0 = Instant::now();
    let max = Duration::from_secs(120);
    let mut c = ctx();

    for bits in [2usize, 3, 17, 53, 113, 512, 2048, 8192] {
        budget(t0, max);
        let ev = parse_and_evaluate("sin(pi)+cos(0)", bits, &mut c).unwrap();
        assert_eq!(ev.valeur.cmp(&BigFloat::from_i32(1, 64)), Some(0), "bits={bits}");
        assert!(c.est_en_cache(Constante::Pi));
    }
}

#[test]
fn sci_stress_longue_somme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);
    let mut c = ctx();

    // 300 termes à plat : pas de récursion profonde dans le parseur
    let somme = vec!["1"; 300].join("+");
    let ev = parse_and_evaluate(&somme, 256, &mut c).unwrap();
    assert_eq!(ev.valeur.cmp(&BigFloat::from_i32(300, 64)), Some(0));
    assert!(ev.est_entier);
    budget(t0, max);

    let s = simp_ok(&somme, &mut c);
    assert_eq!(s.to_string(), "300");
    budget(t0, max);
}

#[test]
fn sci_stress_grand_entier() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);
    let mut c = ctx();

    let grand = "123456789".repeat(20);
    let s = simp_ok(&format!("{grand}*{grand}"), &mut c);
    assert!(s.comme_entier().is_some());
    budget(t0, max);

    let s = simp_ok(&format!("sqrt({grand}*{grand})"), &mut c);
    assert_eq!(s.to_string(), grand);
    budget(t0, max);
}

#[test]
fn sci_stress_profondeur() {
    let mut c = ctx();
    // (10 + 1) * 6 niveaux < 100
    let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
    assert!(parse_and_evaluate(&ok, 64, &mut c).is_ok());

    let trop = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
    // > 1024 caractères : refusé avant même la lecture
    assert!(parse_and_evaluate(&trop, 64, &mut c).is_err());

    let trop = format!("{}1{}", "(".repeat(400), ")".repeat(400));
    assert!(matches!(
        parse_and_evaluate(&trop, 64, &mut c),
        Err(Erreur::Syntaxe(ErreurSyntaxe::ProfondeurMaximale(_)))
    ));
}
