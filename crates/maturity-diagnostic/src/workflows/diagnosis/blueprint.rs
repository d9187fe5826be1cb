use super::domain::{
    FeedbackLevels, IndustryId, Question, QuestionId, Questionnaire, Section, SectionId,
};
use super::validation::DEFAULT_OPTION_COUNT;

pub const STANDARD_INDUSTRY_ID: &str = "default-geral";
pub const STANDARD_INDUSTRY_NAME: &str = "Geral";

/// Built-in budgeting-process questionnaire shipped with the general scope.
#[derive(Debug)]
pub struct QuestionnaireBlueprint {
    sections: Vec<Section>,
}

impl QuestionnaireBlueprint {
    pub fn standard() -> Self {
        Self {
            sections: standard_sections(),
        }
    }

    pub fn industry_id() -> IndustryId {
        IndustryId(STANDARD_INDUSTRY_ID.to_string())
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn questionnaire(&self) -> Questionnaire {
        Questionnaire::from_parts(
            Self::industry_id(),
            DEFAULT_OPTION_COUNT,
            self.sections.clone(),
        )
    }
}

fn section(id: &str, title: &str, questions: Vec<Question>) -> Section {
    Section {
        id: SectionId(id.to_string()),
        title: title.to_string(),
        questions,
        feedback: Some(FeedbackLevels::defaults()),
    }
}

fn question(id: &str, text: &str, options: [&str; 4]) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        text: text.to_string(),
        options: options.iter().map(|option| option.to_string()).collect(),
        disabled: false,
    }
}

fn standard_sections() -> Vec<Section> {
    vec![
        section(
            "gerais",
            "Gerais",
            vec![
                question(
                    "q1",
                    "Qual é a percepção geral sobre o processo orçamentário na empresa?",
                    [
                        "Caótico e manual",
                        "Organizado mas desconectado",
                        "Integrado e fluido",
                        "Altamente estratégico e automatizado",
                    ],
                ),
                question(
                    "q2",
                    "Quanto tempo a empresa leva para fechar o ciclo orçamentário?",
                    ["Mais de 4 meses", "2 a 4 meses", "1 a 2 meses", "Menos de 1 mês"],
                ),
                question(
                    "q3",
                    "Qual o nível de confiança nos dados orçados?",
                    ["Baixo", "Médio", "Alto", "Total"],
                ),
                question(
                    "q4",
                    "Com que frequência o orçamento é revisado?",
                    [
                        "Nunca",
                        "Anualmente",
                        "Semestralmente",
                        "Mensalmente/Trimestralmente",
                    ],
                ),
                question(
                    "q5",
                    "Qual a principal ferramenta utilizada?",
                    [
                        "Papel/Planilhas manuais",
                        "Planilhas complexas com macros",
                        "ERP básico",
                        "Sistema de gestão orçamentária dedicado (EPM/CPM)",
                    ],
                ),
                question(
                    "q6",
                    "Como é o envolvimento dos gestores no processo?",
                    [
                        "Nenhum",
                        "Baixo/Forçado",
                        "Médio/Colaborativo",
                        "Alto/Donos do número",
                    ],
                ),
            ],
        ),
        section(
            "controladoria",
            "Controladoria FP&A",
            vec![
                question(
                    "c1",
                    "A controladoria atua mais como?",
                    [
                        "Compiladora de dados",
                        "Auditora de números",
                        "Parceira de negócios",
                        "Estratega do negócio",
                    ],
                ),
                question(
                    "c2",
                    "Como é feito o DRE Orçado?",
                    [
                        "Não é feito",
                        "Manual em Excel",
                        "Parcialmente automatizado",
                        "Totalmente integrado ao realizado",
                    ],
                ),
                question(
                    "c3",
                    "Existe projeção de Fluxo de Caixa indireto?",
                    [
                        "Não",
                        "Sim, manual",
                        "Sim, automatizado",
                        "Sim, com cenários em tempo real",
                    ],
                ),
                question(
                    "c4",
                    "O Balanço Patrimonial é projetado?",
                    [
                        "Não",
                        "Raramente",
                        "Sim, mas desconectado",
                        "Sim, integrado ao DRE e Caixa",
                    ],
                ),
                question(
                    "c5",
                    "Qual o nível de detalhe das despesas?",
                    [
                        "Conta contábil apenas",
                        "Centro de Custo",
                        "Centro de Custo + Projeto/Atividade",
                        "Multidimensional (CC, Projeto, Produto, etc)",
                    ],
                ),
                question(
                    "c6",
                    "Como são tratados os rateios de despesas?",
                    [
                        "Não existem",
                        "Base fixa/manual",
                        "Drivers simples",
                        "Drivers dinâmicos e múltiplos estágios",
                    ],
                ),
            ],
        ),
        section(
            "comercial",
            "Comercial",
            vec![
                question(
                    "v1",
                    "Como é feita a projeção de vendas?",
                    [
                        "Meta Top-Down apenas",
                        "Baseada em histórico",
                        "Colaborativa (Bottom-up)",
                        "Preditiva com drivers de mercado",
                    ],
                ),
                question(
                    "v2",
                    "Existe orçamento de volume x preço?",
                    [
                        "Não, apenas valor total",
                        "Em alguns produtos",
                        "Sim, para principais linhas",
                        "Sim, para todo o mix",
                    ],
                ),
                question(
                    "v3",
                    "O orçamento de deduções de vendas é detalhado?",
                    [
                        "Percentual fixo sobre Venda Bruta",
                        "Por canal/produto (médio)",
                        "Cálculo imposto a imposto",
                        "Detalhado por cliente/SKU e tributo",
                    ],
                ),
                question(
                    "v4",
                    "Existe simulação de cenários de vendas?",
                    [
                        "Não",
                        "Apenas otimista/pessimista",
                        "Simulações manuais",
                        "Simulações dinâmicas (what-if)",
                    ],
                ),
                question(
                    "v5",
                    "A equipe comercial tem acesso fácil às suas metas e real?",
                    [
                        "Não",
                        "Recebem relatórios estáticos",
                        "Acesso limitado",
                        "Dashboard online em tempo real",
                    ],
                ),
                question(
                    "v6",
                    "Existe cálculo de comissões no orçamento?",
                    [
                        "Não",
                        "Estimativa global",
                        "Por vendedor",
                        "Regra detalhada por SKU/Canal",
                    ],
                ),
            ],
        ),
        section(
            "operacoes",
            "Operações",
            vec![
                question(
                    "o1",
                    "Como é o orçamento de produção/serviços?",
                    [
                        "Baseado em histórico financeiro",
                        "Baseado em volume de vendas",
                        "BOM (Ficha Técnica) explodida",
                        "BOM + Capacidade instalada (MRP)",
                    ],
                ),
                question(
                    "o2",
                    "Os custos variáveis são calculados como?",
                    [
                        "% da Receita",
                        "Custo médio histórico",
                        "Custo padrão",
                        "Custo padrão com revisão periódica",
                    ],
                ),
                question(
                    "o3",
                    "Existe orçamento de investimentos (CAPEX)?",
                    [
                        "Não",
                        "Lista de desejos",
                        "Projetos aprovados",
                        "Gestão de portfólio de projetos com ROI",
                    ],
                ),
                question(
                    "o4",
                    "Como é projetado o headcount operacional?",
                    [
                        "Manual/Global",
                        "Por setor",
                        "Baseado em drivers de volume",
                        "Otimizado por turno/capacidade",
                    ],
                ),
                question(
                    "o5",
                    "Existe controle de estoques projetado?",
                    [
                        "Não",
                        "Giro médio global",
                        "Giro por categoria",
                        "Giro por SKU e política de cobertura",
                    ],
                ),
                question(
                    "o6",
                    "A manutenção é orçada?",
                    [
                        "Não",
                        "Valor fixo mensal",
                        "Base zero",
                        "Preventiva/Corretiva baseada em ativos",
                    ],
                ),
            ],
        ),
        section(
            "pessoas",
            "Pessoas (RH)",
            vec![
                question(
                    "r1",
                    "Como é feito o orçamento de folha?",
                    [
                        "Linha única de custo",
                        "Por centro de custo",
                        "Por cargo/salário médio",
                        "Matricial (colaborador a colaborador)",
                    ],
                ),
                question(
                    "r2",
                    "Os encargos e benefícios são calculados como?",
                    [
                        "Flat (% sobre salário)",
                        "Por sindicato",
                        "Regra detalhada por verba",
                        "Cálculo exato por benefício/perfil",
                    ],
                ),
                question(
                    "r3",
                    "Existe planejamento de contratações?",
                    [
                        "Não",
                        "Valor global",
                        "Vagas aprovadas",
                        "Cronograma físico-financeiro de vagas",
                    ],
                ),
                question(
                    "r4",
                    "Como são projetados os aumentos/dissídios?",
                    [
                        "Não são",
                        "Percentual global",
                        "Por sindicato/mês base",
                        "Por mérito individual + dissídio",
                    ],
                ),
                question(
                    "r5",
                    "O orçamento de treinamento é detalhado?",
                    ["Não", "Verba global", "Por área", "Por colaborador/curso"],
                ),
                question(
                    "r6",
                    "O RH participa ativamente da validação?",
                    [
                        "Não",
                        "Apenas recebe os números",
                        "Valida headcount",
                        "Valida toda a despesa de pessoal",
                    ],
                ),
            ],
        ),
        section(
            "conectados",
            "Resultados Conectados",
            vec![
                question(
                    "x1",
                    "Os sistemas (Vendas, RH, Produção) conversam com o Orçamento?",
                    [
                        "Não, tudo manual",
                        "Algumas importações",
                        "Integração via banco de dados",
                        "Integração nativa/API em tempo real",
                    ],
                ),
                question(
                    "x2",
                    "Quanto tempo leva para gerar um relatório de realizado x orçado?",
                    [
                        "Dias/Semanas",
                        "1 a 2 dias",
                        "Algumas horas",
                        "Imediato (Real-time)",
                    ],
                ),
                question(
                    "x3",
                    "A empresa utiliza Dashboards de gestão?",
                    [
                        "Não, apenas planilhas",
                        "Sim, estáticos (PPT)",
                        "Sim, BI (PowerBI/Tableau)",
                        "Sim, integrados à ferramenta de planejamento",
                    ],
                ),
                question(
                    "x4",
                    "É fácil fazer análises de \"root-cause\" (clicar e detalhar)?",
                    [
                        "Não é possível",
                        "Difícil (precisa abrir várias fontes)",
                        "Razoável",
                        "Sim, Drill-down completo",
                    ],
                ),
                question(
                    "x5",
                    "A tomada de decisão é baseada em dados?",
                    [
                        "Não, feeling",
                        "Às vezes",
                        "Maioria das vezes",
                        "Sempre (Data Driven)",
                    ],
                ),
                question(
                    "x6",
                    "Qual a satisfação com a tecnologia atual?",
                    ["Insatisfeito", "Neutro", "Satisfeito", "Muito Satisfeito"],
                ),
            ],
        ),
    ]
}
